//! Dosing pipeline
//!
//! patient → eGFR → individual clearance → dose recommendation → concentration curve
//!
//! [`compute_dose_and_trajectory`] runs the pipeline for one patient and one drug profile.
//! [`DosingEngine`] adds drug lookup by name against an injected [`DrugLibrary`] and parallel
//! evaluation of patient cohorts.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    clearance::ClearanceScaler,
    dose::{solve_dose, DoseRecommendation},
    drug::{DrugLibrary, DrugProfile, LibraryError},
    patient::PatientProfile,
    renal::{estimate_egfr, Egfr},
    settings::EngineSettings,
    simulator::{ConcentrationSimulator, ConcentrationTrajectory},
    DosingError,
};

/// Everything the display layer needs for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingReport {
    pub egfr: Egfr,
    pub recommendation: DoseRecommendation,
    pub trajectory: ConcentrationTrajectory,
}

impl DosingReport {
    pub fn into_parts(self) -> (DoseRecommendation, ConcentrationTrajectory) {
        (self.recommendation, self.trajectory)
    }
}

/// Run the full pipeline for one patient
///
/// # Errors
/// - [`DosingError::Settings`] if `settings` is invalid
/// - [`DosingError::InvalidInput`] if the patient is outside the configured bounds, or the
///   individual clearance is not positive
/// - [`DosingError::NumericalError`] if the simulation produces undefined values
pub fn compute_dose_and_trajectory(
    patient: &PatientProfile,
    drug: &DrugProfile,
    settings: &EngineSettings,
) -> Result<DosingReport, DosingError> {
    settings.validate()?;
    if let Some(bounds) = &settings.bounds {
        bounds.check(patient)?;
    }

    let egfr = estimate_egfr(
        patient.age() as f64,
        patient.serum_creatinine(),
        patient.sex(),
    )?;
    tracing::debug!(drug = drug.name(), egfr = egfr.value(), "estimated renal function");

    let scaler = ClearanceScaler::new(settings.reference_gfr)?;
    let clearance = scaler.scale(drug.population_clearance(), egfr.value());

    let recommendation = solve_dose(drug, patient.weight(), clearance)?;
    tracing::debug!(
        dose = recommendation.dose,
        clearance = recommendation.clearance,
        volume = recommendation.volume,
        "derived maintenance dose"
    );

    let simulator = ConcentrationSimulator::new(settings.simulation)?;
    let trajectory = simulator.simulate_recommendation(&recommendation)?;

    Ok(DosingReport {
        egfr,
        recommendation,
        trajectory,
    })
}

/// Dosing pipeline bound to a drug library and settings
#[derive(Debug, Clone)]
pub struct DosingEngine {
    library: DrugLibrary,
    settings: EngineSettings,
}

impl DosingEngine {
    pub fn new(library: DrugLibrary, settings: EngineSettings) -> Result<Self, DosingError> {
        settings.validate()?;
        Ok(Self { library, settings })
    }

    /// Engine over the built-in drug table with default settings
    pub fn builtin() -> Result<Self, DosingError> {
        Self::new(DrugLibrary::builtin()?, EngineSettings::default())
    }

    pub fn library(&self) -> &DrugLibrary {
        &self.library
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Compute for a drug in the library
    pub fn compute(
        &self,
        patient: &PatientProfile,
        drug_name: &str,
    ) -> Result<DosingReport, DosingError> {
        let drug = self.library.get(drug_name)?;
        self.compute_with(patient, drug)
    }

    /// Compute for an explicit drug profile, which need not be in the library
    pub fn compute_with(
        &self,
        patient: &PatientProfile,
        drug: &DrugProfile,
    ) -> Result<DosingReport, DosingError> {
        compute_dose_and_trajectory(patient, drug, &self.settings).inspect_err(|e| {
            tracing::warn!(drug = drug.name(), error = %e, "dosing computation failed")
        })
    }

    /// Compute for every patient in parallel
    ///
    /// Results are in input order. A failure for one patient does not affect the others;
    /// an unknown drug fails every entry.
    pub fn compute_cohort(
        &self,
        patients: &[PatientProfile],
        drug_name: &str,
    ) -> Vec<Result<DosingReport, DosingError>> {
        let drug = match self.library.get(drug_name) {
            Ok(drug) => drug,
            Err(_) => {
                tracing::warn!(drug = drug_name, "cohort requested for unknown drug");
                return patients
                    .iter()
                    .map(|_| Err(LibraryError::UnknownDrug(drug_name.to_string()).into()))
                    .collect();
            }
        };

        patients
            .par_iter()
            .map(|patient| self.compute_with(patient, drug))
            .collect()
    }
}
