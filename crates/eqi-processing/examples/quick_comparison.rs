//! Quick EQI comparison of two synthetic recordings
//!
//! Simulates a clean resting recording and a degraded one (mains
//! interference, drift, heavy noise), evaluates the quality index, and
//! prints the percent table the way a downstream heatmap would consume
//! it.

use eqi_processing::{EqiConfig, QualityFeature, QualityIndex};
use eqi_simulation::{EegConfig, EegSimulator};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let rate = 250.0;
    let channels = 4;
    let duration = 30.0;

    let clean = EegSimulator::new(EegConfig {
        seed: Some(1),
        ..EegConfig::resting(rate, channels, duration)
    })?
    .generate()?;

    let test = EegSimulator::new(EegConfig {
        seed: Some(2),
        ..EegConfig::degraded(rate, channels, duration)
    })?
    .generate()?;

    // Half-second windows, 10-sample slide on both sides
    let mut engine = QualityIndex::new(EqiConfig::rate_matched(rate, rate))?;
    let report = engine.evaluate(&clean, &test)?;

    println!(
        "EEG Quality Index: {} vs {}\n",
        report.clean_condition, report.test_condition
    );

    print!("{:<16}", "");
    for label in report.column_labels() {
        print!("{:>10}", label);
    }
    println!();

    for feature in QualityFeature::ALL {
        print!("{:<16}", feature.label());
        for value in report.percent.row(feature) {
            print!("{:>10.1}", value);
        }
        println!();
    }

    println!("\nReport JSON ({} bytes)", report.to_json()?.len());

    Ok(())
}
