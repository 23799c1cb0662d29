//! Renal function estimation
//!
//! eGFR is computed with a simplified CKD-EPI style creatinine equation:
//!
//! ```text
//! eGFR = 141 · κ^α · 0.993^age · (1.018 if female) / Scr
//! ```
//!
//! with (κ, α) = (0.9, −0.411) for men and (0.7, −0.329) for women. The clinical form of the
//! equation also carries a `min(Scr/κ, 1)^α · max(Scr/κ, 1)^−1.209` term; this variant applies
//! κ^α as a constant factor instead and divides by Scr directly. Results will therefore differ
//! from published CKD-EPI calculators.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{patient::Sex, DosingError};

const EGFR_SCALE: f64 = 141.0;
const AGE_FACTOR: f64 = 0.993;
const FEMALE_FACTOR: f64 = 1.018;

/// Estimated glomerular filtration rate, in mL/min/1.73m²
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Egfr(f64);

impl Egfr {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Egfr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} mL/min/1.73m²", self.0)
    }
}

/// (κ, α) for the given sex
#[inline(always)]
fn coefficients(sex: Sex) -> (f64, f64) {
    match sex {
        Sex::Male => (0.9, -0.411),
        Sex::Female => (0.7, -0.329),
    }
}

/// Estimate eGFR from age, serum creatinine and sex
///
/// # Arguments
/// * `age` - Age in years
/// * `serum_creatinine` - Serum creatinine in mg/dL
/// * `sex` - Selects the κ/α coefficients and the female multiplier
///
/// # Errors
/// [`DosingError::InvalidInput`] if `serum_creatinine` or `age` is not strictly positive and
/// finite.
pub fn estimate_egfr(age: f64, serum_creatinine: f64, sex: Sex) -> Result<Egfr, DosingError> {
    if !(serum_creatinine.is_finite() && serum_creatinine > 0.0) {
        return Err(DosingError::invalid("serum_creatinine", serum_creatinine));
    }
    if !(age.is_finite() && age > 0.0) {
        return Err(DosingError::invalid("age", age));
    }

    let (kappa, alpha) = coefficients(sex);
    let sex_factor = match sex {
        Sex::Male => 1.0,
        Sex::Female => FEMALE_FACTOR,
    };
    let egfr =
        EGFR_SCALE * kappa.powf(alpha) * AGE_FACTOR.powf(age) * sex_factor / serum_creatinine;

    if !egfr.is_finite() {
        return Err(DosingError::numerical(format!(
            "eGFR evaluated to {egfr} for age {age} and creatinine {serum_creatinine}"
        )));
    }
    Ok(Egfr(egfr))
}
