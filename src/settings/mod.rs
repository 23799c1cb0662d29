//! Engine configuration
//!
//! [`EngineSettings`] can be built in code or read from JSON. Every field has a default, so a
//! settings file only needs to name what it changes:
//!
//! ```json
//! {
//!   "reference_gfr": 90.0,
//!   "simulation": { "ka": 1.2, "sample_count": 100, "horizon": 24.0, "method": "ode" },
//!   "bounds": { "weight": { "min": 30.0, "max": 150.0 } }
//! }
//! ```
//!
//! Setting `"bounds": null` turns off re-validation of patient inputs against clinical ranges.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{clearance::REFERENCE_GFR, patient::PatientBounds, simulator::SimulationSettings};

/// Errors that can occur when loading or validating [`EngineSettings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid setting '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Renal function (mL/min/1.73m²) the population clearances refer to
    pub reference_gfr: f64,
    pub simulation: SimulationSettings,
    /// Clinical ranges patient inputs are re-checked against; `None` skips the check
    pub bounds: Option<PatientBounds>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reference_gfr: REFERENCE_GFR,
            simulation: SimulationSettings::default(),
            bounds: Some(PatientBounds::default()),
        }
    }
}

impl EngineSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.reference_gfr.is_finite() && self.reference_gfr > 0.0) {
            return Err(SettingsError::Invalid {
                field: "reference_gfr".to_string(),
                reason: format!("must be positive and finite, got {}", self.reference_gfr),
            });
        }
        self.simulation
            .validate()
            .map_err(|e| SettingsError::Invalid {
                field: "simulation".to_string(),
                reason: e.to_string(),
            })?;
        if let Some(bounds) = &self.bounds {
            bounds.validate().map_err(|reason| SettingsError::Invalid {
                field: "bounds".to_string(),
                reason,
            })?;
        }
        Ok(())
    }

    pub fn without_bounds(mut self) -> Self {
        self.bounds = None;
        self
    }
}
