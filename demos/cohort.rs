use anyhow::Result;
use renaldose::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = EngineSettings::from_json(
        r#"{ "simulation": { "method": "analytical", "sample_count": 25 } }"#,
    )?;
    let engine = DosingEngine::new(DrugLibrary::builtin()?, settings)?;

    let mut patients = Vec::new();
    for scr in [0.6, 1.0, 1.5, 2.5, 4.0, 12.0] {
        for sex in [Sex::Male, Sex::Female] {
            patients.push(PatientProfile::new(75.0, 65, scr, sex)?);
        }
    }

    println!("Scr\tSex\teGFR\tDose (mg/24h)\tC(24h)");
    for (patient, result) in patients
        .iter()
        .zip(engine.compute_cohort(&patients, "Vancomycin"))
    {
        match result {
            Ok(report) => println!(
                "{:.1}\t{:?}\t{:.1}\t{:.0}\t\t{:.1}",
                patient.serum_creatinine(),
                patient.sex(),
                report.egfr.value(),
                report.recommendation.dose,
                report.trajectory.last().map_or(f64::NAN, |(_, c)| c),
            ),
            Err(e) => println!(
                "{:.1}\t{:?}\twithheld: {}",
                patient.serum_creatinine(),
                patient.sex(),
                e
            ),
        }
    }
    Ok(())
}
