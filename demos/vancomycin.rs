use anyhow::Result;
use renaldose::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let engine = DosingEngine::builtin()?;
    let patient = PatientProfile::new(70.0, 45, 1.0, Sex::Male)?;
    let report = engine.compute(&patient, "Vancomycin")?;
    let range = engine.library().get("Vancomycin")?.therapeutic_range();

    println!("eGFR: {}", report.egfr);
    println!("Clearance: {:.2} L/h", report.recommendation.clearance);
    println!("Volume of distribution: {:.2} L", report.recommendation.volume);
    println!(
        "Dose: {:.2} mg every {} hours",
        report.recommendation.dose, report.recommendation.interval
    );

    println!("\nTime (h)\tConcentration (mg/L)");
    for (t, c) in report.trajectory.iter().step_by(11) {
        println!("{:.2}\t\t{:.2}", t, c);
    }
    if let Some(peak) = report.trajectory.peak() {
        println!("\nCmax {:.2} mg/L at {:.2} h", peak.cmax, peak.tmax);
    }
    println!("AUC(0-24) {:.1} mg*h/L", report.trajectory.auc());
    println!(
        "Samples within {}-{} mg/L: {:.0}%",
        range.lower,
        range.upper,
        report.trajectory.fraction_within(&range) * 100.0
    );

    println!("\nSimplified teaching model. Not for clinical use.");
    Ok(())
}
