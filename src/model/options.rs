//! Options that steer model construction.

use crate::error::{FramError, Result};
use crate::geometry::DEFAULT_CURVINESS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelOptions {
    /// Bend of synthesized curves, as a fraction of the chord length.
    pub curviness: f64,
    /// Derive curves for connections the file declares without geometry.
    /// When false, such documents fail to load.
    pub synthesize_missing_curves: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self { curviness: DEFAULT_CURVINESS, synthesize_missing_curves: true }
    }
}

impl ModelOptions {
    /// Reads options from JSON. Absent keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| FramError::InvalidOption(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.curviness.is_finite() || !(0.0..=1.0).contains(&self.curviness) {
            return Err(FramError::InvalidOption(format!(
                "curviness must lie in [0, 1], got {}",
                self.curviness
            )));
        }
        Ok(())
    }
}
