//! Patient demographics and renal markers
//!
//! A [`PatientProfile`] is the validated input of a dosing computation. Field-level checks
//! (positivity, finiteness) happen in [`PatientProfile::new`]; the clinically plausible ranges
//! enforced by the input form live in [`PatientBounds`] and are applied by the engine when
//! enabled in the settings.

mod positive;

pub use positive::Positive;

use serde::{Deserialize, Serialize};

use crate::DosingError;

/// Biological sex, selecting the renal-function formula coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_is_male(is_male: bool) -> Self {
        if is_male {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    pub fn is_male(&self) -> bool {
        matches!(self, Sex::Male)
    }
}

/// Patient inputs to a dosing computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatientProfile {
    weight: Positive,
    age: u32,
    serum_creatinine: Positive,
    sex: Sex,
}

impl PatientProfile {
    /// Create a new patient profile
    ///
    /// # Arguments
    /// * `weight` - Body weight in kg
    /// * `age` - Age in whole years
    /// * `serum_creatinine` - Serum creatinine in mg/dL
    /// * `sex` - Biological sex
    ///
    /// # Errors
    /// [`DosingError::InvalidInput`] if weight or creatinine are not strictly positive and
    /// finite, or if age is zero.
    pub fn new(
        weight: f64,
        age: u32,
        serum_creatinine: f64,
        sex: Sex,
    ) -> Result<Self, DosingError> {
        if age == 0 {
            return Err(DosingError::invalid("age", age));
        }
        Ok(Self {
            weight: Positive::new("weight", weight)?,
            age,
            serum_creatinine: Positive::new("serum_creatinine", serum_creatinine)?,
            sex,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight.get()
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn serum_creatinine(&self) -> f64 {
        self.serum_creatinine.get()
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }
}

/// Closed interval used to bound a patient field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Clinically plausible ranges for patient inputs
///
/// The defaults mirror what the data-entry form accepts: weight 30-150 kg, age 18-100 years and
/// serum creatinine 0.1-10.0 mg/dL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatientBounds {
    pub weight: Bound,
    pub age: Bound,
    pub serum_creatinine: Bound,
}

impl Default for PatientBounds {
    fn default() -> Self {
        Self {
            weight: Bound::new(30.0, 150.0),
            age: Bound::new(18.0, 100.0),
            serum_creatinine: Bound::new(0.1, 10.0),
        }
    }
}

impl PatientBounds {
    /// Check every field of `patient`, reporting the first one out of range
    pub fn check(&self, patient: &PatientProfile) -> Result<(), DosingError> {
        let fields = [
            ("weight", patient.weight(), self.weight),
            ("age", patient.age() as f64, self.age),
            (
                "serum_creatinine",
                patient.serum_creatinine(),
                self.serum_creatinine,
            ),
        ];
        for (name, value, bound) in fields {
            if !bound.contains(value) {
                return Err(DosingError::InvalidInput {
                    param: name.to_string(),
                    value: format!("{value} (expected {}..={})", bound.min, bound.max),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, bound) in [
            ("weight", self.weight),
            ("age", self.age),
            ("serum_creatinine", self.serum_creatinine),
        ] {
            if !(bound.min.is_finite() && bound.max.is_finite()) || bound.min > bound.max {
                return Err(format!(
                    "bounds for {name} must be finite with min <= max, got {}..={}",
                    bound.min, bound.max
                ));
            }
        }
        Ok(())
    }
}
