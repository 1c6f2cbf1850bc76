//! Generate a synthetic EEG recording and print per-channel statistics

use eqi_simulation::{EegConfig, EegSimulator, SignalPattern};

fn main() -> anyhow::Result<()> {
    let mut config = EegConfig::degraded(250.0, 4, 10.0);
    config.seed = Some(2024);
    config.patterns.push(SignalPattern::Burst {
        on_duration: 0.5,
        off_duration: 2.0,
        frequency: 4.0,
        amplitude: 40.0,
    });

    let recording = EegSimulator::new(config)?.generate()?;

    println!(
        "Simulated {} ({}): {} channels x {} samples @ {} Hz",
        recording.id,
        recording.metadata.condition,
        recording.channel_count(),
        recording.samples_per_channel(),
        recording.sampling_rate()
    );

    for (ch, name) in recording.channel_names().iter().enumerate() {
        let stats = recording.channel_stats(ch)?;
        println!(
            "  {:>4}: mean {:>7.2}  rms {:>7.2}  p-p {:>8.2}",
            name, stats.mean, stats.rms, stats.peak_to_peak
        );
    }

    Ok(())
}
