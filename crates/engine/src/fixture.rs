use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::native::{NativeEngine, OutSlots};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRoute {
    pub from: u32,
    pub to: u32,
    /// Full route including both endpoints.
    pub via: Vec<u32>,
}

/// JSON document describing a canned engine.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineFixture {
    /// Unit-sphere coordinates, one entry per city.
    pub cities: Vec<[f64; 3]>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub routes: Vec<FixtureRoute>,
}

/// [`NativeEngine`] that answers from an [`EngineFixture`].
///
/// Pairs without a listed route fly direct; a city routed to itself yields
/// the single-element route. Output larger than the buffer is truncated but
/// its full length is still reported, exactly like an engine that overran.
#[derive(Debug, Clone)]
pub struct FixtureEngine {
    fixture: EngineFixture,
    calls: usize,
}

impl FixtureEngine {
    pub fn new(fixture: EngineFixture) -> Self {
        Self { fixture, calls: 0 }
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let fixture =
            serde_json::from_str(json).map_err(|e| EngineError::Fixture(e.to_string()))?;
        Ok(Self::new(fixture))
    }

    pub fn fixture(&self) -> &EngineFixture {
        &self.fixture
    }

    /// Number of native calls served so far.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn route(&self, source: i32, dest: i32) -> Vec<f64> {
        if source == dest {
            return vec![f64::from(source)];
        }
        self.fixture
            .routes
            .iter()
            .find(|r| i32::try_from(r.from) == Ok(source) && i32::try_from(r.to) == Ok(dest))
            .map(|r| r.via.iter().map(|&c| f64::from(c)).collect())
            .unwrap_or_else(|| vec![f64::from(source), f64::from(dest)])
    }

    fn name(&self, city: i32) -> Vec<f64> {
        usize::try_from(city)
            .ok()
            .and_then(|idx| self.fixture.names.get(idx))
            .map(|name| name.chars().map(|c| f64::from(u32::from(c))).collect())
            .unwrap_or_default()
    }
}

impl NativeEngine for FixtureEngine {
    unsafe fn airport_xyz(&mut self, out: OutSlots) {
        self.calls += 1;
        let flat: Vec<f64> = self.fixture.cities.iter().flatten().copied().collect();
        // SAFETY: forwarded from the caller's contract.
        unsafe { out.write_all(&flat) }
    }

    unsafe fn path_out_real(&mut self, out: OutSlots, source: i32, dest: i32) {
        self.calls += 1;
        let route = self.route(source, dest);
        // SAFETY: forwarded from the caller's contract.
        unsafe { out.write_all(&route) }
    }

    unsafe fn city_name(&mut self, out: OutSlots, city: i32) {
        self.calls += 1;
        let name = self.name(city);
        // SAFETY: forwarded from the caller's contract.
        unsafe { out.write_all(&name) }
    }
}
