//! Drug parameters
//!
//! A [`DrugProfile`] carries the population pharmacokinetic parameters of one drug. Profiles
//! are only constructed through validation, either directly with [`DrugProfile::new`] or while
//! loading a [`DrugLibrary`], so downstream formulas can rely on every field being positive and
//! on the therapeutic range being well ordered.

mod errors;
mod library;

pub use errors::LibraryError;
pub use library::DrugLibrary;

use serde::{Deserialize, Serialize};

/// Therapeutic concentration window, in mg/L (equivalently µg/mL)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TherapeuticRange {
    pub lower: f64,
    pub upper: f64,
}

impl TherapeuticRange {
    /// Midpoint of the window, used as the steady-state target
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.lower && concentration <= self.upper
    }
}

/// Population PK parameters for a single drug
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugProfile {
    name: String,
    population_clearance: f64,
    population_vd_per_kg: f64,
    therapeutic_range: TherapeuticRange,
}

impl DrugProfile {
    /// Create a validated drug profile
    ///
    /// # Arguments
    /// * `name` - Drug name, used as the library key
    /// * `population_clearance` - Clearance in L/h at the reference renal function
    /// * `population_vd_per_kg` - Volume of distribution in L/kg
    /// * `therapeutic_range` - Target concentration window in mg/L
    pub fn new(
        name: impl Into<String>,
        population_clearance: f64,
        population_vd_per_kg: f64,
        therapeutic_range: TherapeuticRange,
    ) -> Result<Self, LibraryError> {
        let name = name.into();
        let invalid = |reason: String| LibraryError::InvalidEntry {
            drug: name.clone(),
            reason,
        };

        for (field, value) in [
            ("population_clearance", population_clearance),
            ("population_vd_per_kg", population_vd_per_kg),
            ("therapeutic_range.lower", therapeutic_range.lower),
            ("therapeutic_range.upper", therapeutic_range.upper),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!(
                    "{field} must be positive and finite, got {value}"
                )));
            }
        }
        if therapeutic_range.lower >= therapeutic_range.upper {
            return Err(invalid(format!(
                "therapeutic_range.lower ({}) must be below therapeutic_range.upper ({})",
                therapeutic_range.lower, therapeutic_range.upper
            )));
        }

        Ok(Self {
            name,
            population_clearance,
            population_vd_per_kg,
            therapeutic_range,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clearance (L/h) of a patient with reference renal function
    pub fn population_clearance(&self) -> f64 {
        self.population_clearance
    }

    /// Volume of distribution per kg of body weight (L/kg)
    pub fn population_vd_per_kg(&self) -> f64 {
        self.population_vd_per_kg
    }

    pub fn therapeutic_range(&self) -> TherapeuticRange {
        self.therapeutic_range
    }
}
