//! Pre-defined waveform components for synthetic EEG traces

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Deterministic waveform components, summed per channel
///
/// Amplitudes are in the recording's native unit (conventionally µV);
/// time is in seconds from recording start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SignalPattern {
    /// Constant offset
    Flat { level: f64 },
    /// Plain sinusoid
    Sinusoid {
        frequency: f64,
        amplitude: f64,
        phase: f64,
    },
    /// Posterior alpha rhythm, fixed at 10 Hz
    AlphaRhythm { amplitude: f64 },
    /// Powerline interference tone
    LineNoise { frequency: f64, amplitude: f64 },
    /// Slow linear drift from one level to another
    DriftRamp {
        start_level: f64,
        end_level: f64,
        duration: f64,
    },
    /// On/off amplitude bursts
    Burst {
        on_duration: f64,
        off_duration: f64,
        frequency: f64,
        amplitude: f64,
    },
}

impl SignalPattern {
    /// Evaluate the component at a given time
    pub fn value_at_time(&self, time: f64) -> f64 {
        match self {
            SignalPattern::Flat { level } => *level,

            SignalPattern::Sinusoid { frequency, amplitude, phase } => {
                amplitude * (2.0 * PI * frequency * time + phase).sin()
            }

            SignalPattern::AlphaRhythm { amplitude } => {
                amplitude * (2.0 * PI * 10.0 * time).sin()
            }

            SignalPattern::LineNoise { frequency, amplitude } => {
                amplitude * (2.0 * PI * frequency * time).sin()
            }

            SignalPattern::DriftRamp { start_level, end_level, duration } => {
                if time >= *duration {
                    *end_level
                } else {
                    start_level + (end_level - start_level) * (time / duration)
                }
            }

            SignalPattern::Burst { on_duration, off_duration, frequency, amplitude } => {
                let cycle = on_duration + off_duration;
                let phase = time % cycle;
                if phase < *on_duration {
                    amplitude * (2.0 * PI * frequency * time).sin()
                } else {
                    0.0
                }
            }
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            SignalPattern::Flat { .. } => "Constant offset",
            SignalPattern::Sinusoid { .. } => "Sinusoid",
            SignalPattern::AlphaRhythm { .. } => "Alpha rhythm",
            SignalPattern::LineNoise { .. } => "Powerline interference",
            SignalPattern::DriftRamp { .. } => "Baseline drift",
            SignalPattern::Burst { .. } => "Burst artifact",
        }
    }

    /// Create common preset patterns
    pub fn presets() -> Vec<(&'static str, SignalPattern)> {
        vec![
            ("Resting alpha", SignalPattern::AlphaRhythm { amplitude: 20.0 }),
            ("Mains 60 Hz", SignalPattern::LineNoise { frequency: 60.0, amplitude: 10.0 }),
            ("Mains 50 Hz", SignalPattern::LineNoise { frequency: 50.0, amplitude: 10.0 }),
            ("Electrode drift", SignalPattern::DriftRamp {
                start_level: 0.0, end_level: 40.0, duration: 30.0,
            }),
            ("Chewing bursts", SignalPattern::Burst {
                on_duration: 0.5, off_duration: 1.5, frequency: 4.0, amplitude: 60.0,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_rhythm_is_10hz() {
        let pattern = SignalPattern::AlphaRhythm { amplitude: 1.0 };
        // Quarter period of 10 Hz is 25 ms
        assert!((pattern.value_at_time(0.025) - 1.0).abs() < 1e-12);
        assert!(pattern.value_at_time(0.0).abs() < 1e-12);
        assert!(pattern.value_at_time(0.1).abs() < 1e-12);
    }

    #[test]
    fn test_drift_ramp_clamps_at_end() {
        let pattern = SignalPattern::DriftRamp {
            start_level: 0.0,
            end_level: 10.0,
            duration: 5.0,
        };
        assert_eq!(pattern.value_at_time(0.0), 0.0);
        assert_eq!(pattern.value_at_time(2.5), 5.0);
        assert_eq!(pattern.value_at_time(100.0), 10.0);
    }

    #[test]
    fn test_burst_gating() {
        let pattern = SignalPattern::Burst {
            on_duration: 1.0,
            off_duration: 1.0,
            frequency: 5.0,
            amplitude: 1.0,
        };
        // Off phase contributes nothing
        assert_eq!(pattern.value_at_time(1.5), 0.0);
        assert_eq!(pattern.value_at_time(3.7), 0.0);
    }

    #[test]
    fn test_descriptions() {
        for (_, pattern) in SignalPattern::presets() {
            assert!(!pattern.description().is_empty());
        }
    }
}
