//! Basic usage of the EQI foundation types
//!
//! Demonstrates recording construction, channel access, statistics, and
//! cropping to an analysis interval.

use eqi_core::{ChannelStats, EegMetadata, Recording, RecordingCondition};
use std::f64::consts::PI;

fn main() -> anyhow::Result<()> {
    println!("=== EQI-Core Basic Usage ===\n");

    // A 4-channel, 30-second recording at 250 Hz: a 10 Hz rhythm with a
    // different amplitude per channel.
    let rate = 250.0;
    let duration = 30.0;
    let samples = (rate * duration) as usize;

    let channels: Vec<Vec<f64>> = (0..4)
        .map(|ch| {
            let amplitude = 10.0 + 5.0 * ch as f64;
            (0..samples)
                .map(|i| amplitude * (2.0 * PI * 10.0 * i as f64 / rate).sin())
                .collect()
        })
        .collect();

    let metadata = EegMetadata::with_channel_names(
        RecordingCondition::EyesOpen,
        rate,
        vec!["F3".into(), "C3".into(), "P7".into(), "O1".into()],
        duration,
    )?;
    let recording = Recording::from_channels(channels, metadata)?;

    println!(
        "Recording {} ({}): {} channels x {} samples",
        recording.id,
        recording.metadata.condition,
        recording.channel_count(),
        recording.samples_per_channel()
    );

    for (ch, name) in recording.channel_names().iter().enumerate() {
        let stats: ChannelStats = recording.channel_stats(ch)?;
        println!(
            "  {:>3}: rms {:>6.2}  p-p {:>6.2}  std {:>6.2}",
            name, stats.rms, stats.peak_to_peak, stats.std_dev
        );
    }

    // Trim away the first and last 5 seconds before analysis
    let cropped = recording.crop(5.0, 25.0)?;
    println!(
        "\nCropped to [5, 25]s: {} samples per channel",
        cropped.samples_per_channel()
    );

    Ok(())
}
