use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::DosingError;

/// A strictly positive, finite real number.
///
/// Construction goes through [`Positive::new`], which names the offending argument in the
/// returned [`DosingError::InvalidInput`]. Formulas that divide by a patient or drug quantity
/// take this type so the check happens once, at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Positive(f64);

impl Positive {
    pub fn new(name: &str, value: f64) -> Result<Self, DosingError> {
        if value.is_finite() && value > 0.0 {
            Ok(Positive(value))
        } else {
            Err(DosingError::invalid(name, value))
        }
    }

    #[inline(always)]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Deref for Positive {
    type Target = f64;

    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl TryFrom<f64> for Positive {
    type Error = DosingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Positive::new("value", value)
    }
}

impl From<Positive> for f64 {
    fn from(value: Positive) -> Self {
        value.0
    }
}

impl fmt::Display for Positive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
