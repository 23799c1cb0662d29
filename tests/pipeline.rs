use approx::assert_relative_eq;
use renaldose::prelude::*;
use renaldose::{estimate_egfr, solve_dose, ClearanceScaler, ConcentrationSimulator};

fn vancomycin() -> DrugProfile {
    DrugLibrary::builtin()
        .unwrap()
        .get("Vancomycin")
        .unwrap()
        .clone()
}

#[test]
fn reference_patient_walkthrough() {
    let egfr = estimate_egfr(45.0, 1.0, Sex::Male).unwrap();
    let expected_egfr = 141.0 * 0.9_f64.powf(-0.411) * 0.993_f64.powf(45.0);
    assert_relative_eq!(egfr.value(), expected_egfr, max_relative = 1e-12);

    let clearance = ClearanceScaler::default().scale(4.5, egfr.value());
    assert_relative_eq!(clearance, 4.5 * expected_egfr / 90.0, max_relative = 1e-12);

    let rec = solve_dose(&vancomycin(), 70.0, clearance).unwrap();
    assert_relative_eq!(rec.volume, 49.0, max_relative = 1e-12);
    assert_eq!(rec.target_concentration, 20.0);
    assert_relative_eq!(rec.dose, 20.0 * clearance * 24.0, max_relative = 1e-12);

    let trajectory = ConcentrationSimulator::default()
        .simulate(rec.dose, rec.clearance, rec.volume)
        .unwrap();
    assert_eq!(trajectory.len(), 100);
    assert_eq!(trajectory.concentrations()[0], 0.0);
}

#[test]
fn egfr_positive_and_sex_dependent() {
    for age in [1.0, 18.0, 45.0, 77.0, 100.0] {
        for scr in [0.1, 0.6, 1.0, 3.3, 10.0] {
            let male = estimate_egfr(age, scr, Sex::Male).unwrap().value();
            let female = estimate_egfr(age, scr, Sex::Female).unwrap().value();
            assert!(male > 0.0 && male.is_finite());
            assert!(female > 0.0 && female.is_finite());
            assert_ne!(male, female);
        }
    }
}

#[test]
fn clearance_scaling_properties() {
    let scaler = ClearanceScaler::default();
    for cl in [0.5, 4.5, 12.0] {
        assert_eq!(scaler.scale(cl, 90.0), cl);
        for g in [10.0, 45.0, 107.3] {
            assert_eq!(scaler.scale(cl, 2.0 * g), 2.0 * scaler.scale(cl, g));
        }
    }
}

#[test]
fn dose_monotone_in_clearance() {
    let drug = vancomycin();
    let doses: Vec<f64> = (1..50)
        .map(|i| solve_dose(&drug, 70.0, i as f64 * 0.25).unwrap().dose)
        .collect();
    assert!(doses.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn pipeline_is_idempotent() {
    let drug = vancomycin();
    let patient = PatientProfile::new(82.5, 67, 1.7, Sex::Female).unwrap();
    let settings = EngineSettings::default();
    let first = compute_dose_and_trajectory(&patient, &drug, &settings).unwrap();
    let second = compute_dose_and_trajectory(&patient, &drug, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_egfr_fails_in_dose_solver() {
    let clearance = ClearanceScaler::default().scale(4.5, 0.0);
    assert_eq!(clearance, 0.0);
    let err = solve_dose(&vancomycin(), 70.0, clearance).unwrap_err();
    assert!(err.is_invalid_input(), "{err}");
}

#[test]
fn worse_renal_function_means_lower_dose() {
    let engine = DosingEngine::builtin().unwrap();
    let healthy = PatientProfile::new(70.0, 45, 0.8, Sex::Male).unwrap();
    let impaired = PatientProfile::new(70.0, 45, 4.0, Sex::Male).unwrap();
    let healthy = engine.compute(&healthy, "Vancomycin").unwrap();
    let impaired = engine.compute(&impaired, "Vancomycin").unwrap();

    assert!(impaired.egfr < healthy.egfr);
    assert!(impaired.recommendation.dose < healthy.recommendation.dose);
    // Same volume, so the slower elimination shows up as a lower ke
    assert_eq!(impaired.recommendation.volume, healthy.recommendation.volume);
    assert!(impaired.recommendation.ke() < healthy.recommendation.ke());
}

#[test]
fn report_splits_into_dose_and_curve() {
    let engine = DosingEngine::builtin().unwrap();
    let patient = PatientProfile::new(70.0, 45, 1.0, Sex::Male).unwrap();
    let (rec, trajectory) = engine.compute(&patient, "Vancomycin").unwrap().into_parts();
    assert!(rec.dose > 0.0);
    assert_eq!(trajectory.times().len(), trajectory.concentrations().len());
    assert!(trajectory.auc() > 0.0);
}

#[test]
fn report_serializes_for_display() {
    let engine = DosingEngine::builtin().unwrap();
    let patient = PatientProfile::new(70.0, 45, 1.0, Sex::Male).unwrap();
    let report = engine.compute(&patient, "Vancomycin").unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["trajectory"]["times"].as_array().unwrap().len(), 100);
    assert_eq!(json["recommendation"]["interval"], 24.0);
}

#[test]
fn settings_file_round_trip_through_engine() {
    let settings = EngineSettings::from_json(
        r#"{ "simulation": { "sample_count": 10, "method": "analytical" }, "bounds": null }"#,
    )
    .unwrap();
    let engine = DosingEngine::new(DrugLibrary::builtin().unwrap(), settings).unwrap();
    let patient = PatientProfile::new(10.0, 5, 0.4, Sex::Female).unwrap();
    let report = engine.compute(&patient, "Vancomycin").unwrap();
    assert_eq!(report.trajectory.len(), 10);
    assert_eq!(report.trajectory.times()[9], 24.0);
}
