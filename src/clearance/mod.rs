use crate::DosingError;

/// Renal function (mL/min/1.73m²) at which the population clearance was measured
pub const REFERENCE_GFR: f64 = 90.0;

/// Scales a population clearance to an individual one by the ratio of the patient's eGFR to a
/// reference renal function.
///
/// The scaling is linear and unclamped. An eGFR of 0 gives a clearance of 0, which is a valid
/// return value here but leaves every downstream quantity that divides by clearance undefined;
/// [`solve_dose`](crate::dose::solve_dose) rejects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearanceScaler {
    reference_gfr: f64,
}

impl Default for ClearanceScaler {
    fn default() -> Self {
        Self {
            reference_gfr: REFERENCE_GFR,
        }
    }
}

impl ClearanceScaler {
    pub fn new(reference_gfr: f64) -> Result<Self, DosingError> {
        if !(reference_gfr.is_finite() && reference_gfr > 0.0) {
            return Err(DosingError::invalid("reference_gfr", reference_gfr));
        }
        Ok(Self { reference_gfr })
    }

    pub fn reference_gfr(&self) -> f64 {
        self.reference_gfr
    }

    /// Individual clearance (L/h) for a patient with the given eGFR
    #[inline(always)]
    pub fn scale(&self, population_clearance: f64, egfr: f64) -> f64 {
        population_clearance * (egfr / self.reference_gfr)
    }
}
