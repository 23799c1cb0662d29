//! Maintenance dose derivation
//!
//! The dose is chosen so that the average steady-state concentration equals the midpoint of the
//! drug's therapeutic range:
//!
//! ```text
//! Css = (Dose · F) / (CL · τ)   =>   Dose = Css · CL · τ / F
//! ```
//!
//! The dosing interval τ and bioavailability F are fixed for this model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{drug::DrugProfile, DosingError};

/// Dosing interval τ, in hours
pub const DOSING_INTERVAL_HOURS: f64 = 24.0;

/// Bioavailability F
pub const BIOAVAILABILITY: f64 = 1.0;

/// A maintenance dose and the individual parameters it was derived from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseRecommendation {
    /// Dose per interval (mg)
    pub dose: f64,
    /// Individual clearance (L/h)
    pub clearance: f64,
    /// Individual volume of distribution (L)
    pub volume: f64,
    /// Steady-state target (mg/L)
    pub target_concentration: f64,
    /// Dosing interval (h)
    pub interval: f64,
}

impl DoseRecommendation {
    /// Elimination rate constant ke = CL / Vd (1/h)
    pub fn ke(&self) -> f64 {
        self.clearance / self.volume
    }
}

impl fmt::Display for DoseRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} mg every {} hours (CL {:.2} L/h, Vd {:.2} L)",
            self.dose, self.interval, self.clearance, self.volume
        )
    }
}

/// Derive the maintenance dose for a patient of `weight` kg with the given individual clearance
///
/// # Errors
/// [`DosingError::InvalidInput`] if `weight` or `individual_clearance` is not strictly positive
/// and finite, or if the resulting dose or volume overflows. A zero clearance (from an eGFR of
/// 0) lands here rather than producing a zero dose.
pub fn solve_dose(
    drug: &DrugProfile,
    weight: f64,
    individual_clearance: f64,
) -> Result<DoseRecommendation, DosingError> {
    if !(weight.is_finite() && weight > 0.0) {
        return Err(DosingError::invalid("weight", weight));
    }
    if !(individual_clearance.is_finite() && individual_clearance > 0.0) {
        return Err(DosingError::invalid(
            "individual_clearance",
            individual_clearance,
        ));
    }

    let volume = drug.population_vd_per_kg() * weight;
    let target_concentration = drug.therapeutic_range().midpoint();
    let dose =
        target_concentration * individual_clearance * DOSING_INTERVAL_HOURS / BIOAVAILABILITY;
    if !volume.is_finite() {
        return Err(DosingError::invalid("volume", volume));
    }
    if !(dose.is_finite() && dose > 0.0) {
        return Err(DosingError::invalid("dose", dose));
    }

    Ok(DoseRecommendation {
        dose,
        clearance: individual_clearance,
        volume,
        target_concentration,
        interval: DOSING_INTERVAL_HOURS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drug::TherapeuticRange;
    use approx::assert_relative_eq;

    fn vancomycin() -> DrugProfile {
        DrugProfile::new(
            "Vancomycin",
            4.5,
            0.7,
            TherapeuticRange {
                lower: 15.0,
                upper: 25.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn reference_dose() {
        let rec = solve_dose(&vancomycin(), 70.0, 5.0).unwrap();
        assert_relative_eq!(rec.volume, 49.0, max_relative = 1e-12);
        assert_eq!(rec.target_concentration, 20.0);
        assert_eq!(rec.interval, 24.0);
        assert_relative_eq!(rec.dose, 2400.0, max_relative = 1e-12);
        assert_relative_eq!(rec.ke(), 5.0 / 49.0, max_relative = 1e-12);
    }

    #[test]
    fn dose_increases_with_clearance() {
        let drug = vancomycin();
        let mut previous = 0.0;
        for cl in [0.01, 0.5, 1.0, 2.5, 4.5, 5.37, 10.0, 50.0] {
            let rec = solve_dose(&drug, 70.0, cl).unwrap();
            assert!(rec.dose > previous, "dose not increasing at CL {cl}");
            previous = rec.dose;
        }
    }

    #[test]
    fn dose_does_not_depend_on_weight() {
        let drug = vancomycin();
        let light = solve_dose(&drug, 40.0, 4.5).unwrap();
        let heavy = solve_dose(&drug, 120.0, 4.5).unwrap();
        assert_eq!(light.dose, heavy.dose);
        assert!(heavy.volume > light.volume);
    }

    #[test]
    fn zero_clearance_is_rejected() {
        match solve_dose(&vancomycin(), 70.0, 0.0) {
            Err(DosingError::InvalidInput { param, .. }) => {
                assert_eq!(param, "individual_clearance")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        for weight in [0.0, -70.0, f64::INFINITY] {
            match solve_dose(&vancomycin(), weight, 4.5) {
                Err(DosingError::InvalidInput { param, .. }) => assert_eq!(param, "weight"),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn overflowing_dose_is_rejected() {
        match solve_dose(&vancomycin(), 70.0, 1e308) {
            Err(DosingError::InvalidInput { param, .. }) => assert_eq!(param, "dose"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn overflowing_volume_is_rejected() {
        let drug = DrugProfile::new(
            "Dense",
            4.5,
            2.0,
            TherapeuticRange {
                lower: 15.0,
                upper: 25.0,
            },
        )
        .unwrap();
        match solve_dose(&drug, 1e308, 4.5) {
            Err(DosingError::InvalidInput { param, .. }) => assert_eq!(param, "volume"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn display() {
        let rec = solve_dose(&vancomycin(), 70.0, 5.0).unwrap();
        assert_eq!(
            rec.to_string(),
            "2400.00 mg every 24 hours (CL 5.00 L/h, Vd 49.00 L)"
        );
    }
}
