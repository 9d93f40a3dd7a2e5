use scene::{MarkerPlacement, Palette, PuckRadii};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Session tuning. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Scale applied to the engine's unit-sphere coordinates.
    #[serde(default = "default_globe_radius")]
    pub globe_radius: f64,

    /// Foreign buffer capacity is `buffer_rows * buffer_cols` f64 elements.
    /// It must cover three coordinates per city.
    #[serde(default = "default_buffer_rows")]
    pub buffer_rows: usize,
    #[serde(default = "default_buffer_cols")]
    pub buffer_cols: usize,

    /// Delay between consecutive segment reveals.
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,

    #[serde(default = "default_marker_lift")]
    pub marker_lift: f64,

    #[serde(default = "default_puck_radius")]
    pub puck_radius: f64,

    /// Thickness of drawn route segments; only passed through to renderers.
    #[serde(default = "default_path_radius")]
    pub path_radius: f64,

    #[serde(default)]
    pub palette: Palette,
}

fn default_globe_radius() -> f64 {
    500.0
}

fn default_buffer_rows() -> usize {
    303
}

fn default_buffer_cols() -> usize {
    4
}

fn default_step_ms() -> u64 {
    60
}

fn default_marker_lift() -> f64 {
    1.0001
}

fn default_puck_radius() -> f64 {
    3.5
}

fn default_path_radius() -> f64 {
    1.5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            globe_radius: default_globe_radius(),
            buffer_rows: default_buffer_rows(),
            buffer_cols: default_buffer_cols(),
            step_ms: default_step_ms(),
            marker_lift: default_marker_lift(),
            puck_radius: default_puck_radius(),
            path_radius: default_path_radius(),
            palette: Palette::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.buffer_capacity() == 0 {
            return Err(SessionError::Config("buffer capacity must be positive".into()));
        }
        if !(self.globe_radius.is_finite() && self.globe_radius > 0.0) {
            return Err(SessionError::Config("globe_radius must be positive".into()));
        }
        Ok(())
    }

    pub fn buffer_capacity(&self) -> usize {
        self.buffer_rows.saturating_mul(self.buffer_cols)
    }

    pub fn marker_placement(&self) -> MarkerPlacement {
        MarkerPlacement {
            globe_radius: self.globe_radius,
            lift: self.marker_lift,
            palette: self.palette,
        }
    }

    pub fn puck_radii(&self) -> PuckRadii {
        PuckRadii::from_puck_radius(self.puck_radius)
    }
}
