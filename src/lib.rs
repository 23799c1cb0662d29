//! Renal-function-adjusted maintenance dosing.
//!
//! The pipeline estimates eGFR from a [`PatientProfile`], scales the drug's population clearance
//! to the patient, derives the dose that puts the average steady-state concentration in the
//! middle of the therapeutic range, and simulates the concentration curve over one dosing
//! interval with a one-compartment model.
//!
//! This is a simplified teaching model. It is not validated for clinical use.
//!
//! ```rust,ignore
//! use renaldose::prelude::*;
//!
//! let engine = DosingEngine::builtin()?;
//! let patient = PatientProfile::new(70.0, 45, 1.0, Sex::Male)?;
//! let report = engine.compute(&patient, "Vancomycin")?;
//! println!("{}", report.recommendation);
//! ```

pub mod clearance;
pub mod dose;
pub mod drug;
pub mod engine;
pub mod error;
pub mod patient;
pub mod renal;
pub mod settings;
pub mod simulator;

pub use crate::clearance::ClearanceScaler;
pub use crate::dose::{solve_dose, DoseRecommendation};
pub use crate::drug::{DrugLibrary, DrugProfile, LibraryError, TherapeuticRange};
pub use crate::engine::{compute_dose_and_trajectory, DosingEngine, DosingReport};
pub use crate::patient::{PatientBounds, PatientProfile, Positive, Sex};
pub use crate::renal::{estimate_egfr, Egfr};
pub use crate::settings::{EngineSettings, SettingsError};
pub use crate::simulator::{
    ConcentrationSimulator, ConcentrationTrajectory, SimulationMethod, SimulationSettings,
};
pub use error::DosingError;

pub mod prelude {
    pub use crate::engine::{compute_dose_and_trajectory, DosingEngine, DosingReport};
    pub use crate::patient::{PatientProfile, Sex};
    pub use crate::settings::EngineSettings;
    pub use crate::simulator::{ConcentrationTrajectory, SimulationMethod, SimulationSettings};
    pub use crate::{DoseRecommendation, DosingError, DrugLibrary, DrugProfile, TherapeuticRange};
}
