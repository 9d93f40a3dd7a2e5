//! Typed decoding of raw engine output.
//!
//! Every call site declares the [`Shape`] it expects before looking at the
//! values. Mismatches are rejected, never coerced.

use foundation::ids::CityId;
use foundation::math::{Vec3, exact_integer};

use crate::error::EngineError;

/// Expected layout of one call's output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    /// Number of elements per logical record.
    pub group: usize,
    /// Every element must be an exact integer.
    pub integral: bool,
}

pub const CATALOG: Shape = Shape {
    name: "catalog",
    group: 3,
    integral: false,
};

pub const ROUTE: Shape = Shape {
    name: "route",
    group: 1,
    integral: true,
};

pub const NAME: Shape = Shape {
    name: "name",
    group: 1,
    integral: true,
};

impl Shape {
    /// Checks grouping, then integrality. Returns the integers for integral shapes.
    pub fn check(self, raw: &[f64]) -> Result<Vec<i64>, EngineError> {
        if raw.len() % self.group != 0 {
            return Err(EngineError::Protocol(format!(
                "{} output has {} values, not a multiple of {}",
                self.name,
                raw.len(),
                self.group
            )));
        }
        if !self.integral {
            return Ok(Vec::new());
        }
        raw.iter()
            .enumerate()
            .map(|(index, &value)| exact_integer(value).ok_or(EngineError::NonIntegral { index, value }))
            .collect()
    }
}

/// Groups raw unit-sphere coordinates into positions scaled by `radius`.
pub fn decode_positions(raw: &[f64], radius: f64) -> Result<Vec<Vec3>, EngineError> {
    CATALOG.check(raw)?;
    Ok(raw
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]).scale(radius))
        .collect())
}

/// Decodes city indices without checking route endpoints.
pub fn decode_indices(raw: &[f64]) -> Result<Vec<CityId>, EngineError> {
    ROUTE
        .check(raw)?
        .into_iter()
        .map(|v| {
            u32::try_from(v)
                .map(CityId)
                .map_err(|_| EngineError::Protocol(format!("route index {v} is out of range")))
        })
        .collect()
}

/// Decodes a route and checks it runs from `source` to `dest`.
pub fn decode_route(raw: &[f64], source: CityId, dest: CityId) -> Result<Vec<CityId>, EngineError> {
    let route = decode_indices(raw)?;
    match (route.first(), route.last()) {
        (None, _) | (_, None) => Err(EngineError::Protocol(format!(
            "empty route from {source} to {dest}"
        ))),
        (Some(&first), Some(&last)) if first != source || last != dest => {
            Err(EngineError::Protocol(format!(
                "route runs {first}..{last}, expected {source}..{dest}"
            )))
        }
        _ => Ok(route),
    }
}

/// Decodes one character code per element into a string.
pub fn decode_name(raw: &[f64]) -> Result<String, EngineError> {
    NAME.check(raw)?
        .into_iter()
        .map(|code| {
            u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| EngineError::Protocol(format!("invalid character code {code}")))
        })
        .collect()
}
