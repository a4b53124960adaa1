//! Simulation parameters supplied by the host.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Box, particle and spawn parameters.
///
/// Missing JSON fields fall back to [`SimConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Common disk radius.
    pub radius: f64,
    /// Common disk mass.
    pub mass: f64,
    /// Number of disks to spawn.
    pub particle_count: usize,
    /// Speed of every spawned disk, in units per frame.
    pub speed: f64,
    /// RNG seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            radius: 5.0,
            mass: 1.0,
            particle_count: 50,
            speed: 2.5,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        validate_box(self.width, self.height, self.radius)?;
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        if u32::try_from(self.particle_count).is_err() {
            return Err(Error::InvalidParam(format!(
                "particle_count {} exceeds u32 range",
                self.particle_count
            )));
        }
        Ok(())
    }
}

/// Box dimensions must be finite, positive and hold at least one disk per axis.
pub(crate) fn validate_box(width: f64, height: f64, radius: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::InvalidParam("radius must be finite and > 0".into()));
    }
    for (name, l) in [("width", width), ("height", height)] {
        if !l.is_finite() || l <= 0.0 {
            return Err(Error::InvalidParam(format!("{name} must be finite and > 0")));
        }
        if l < 2.0 * radius {
            return Err(Error::InvalidParam(format!(
                "{name} must be at least 2 * radius"
            )));
        }
    }
    Ok(())
}
