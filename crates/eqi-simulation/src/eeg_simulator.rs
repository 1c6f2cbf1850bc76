//! Synthetic EEG generation with reproducible noise

use crate::signal_patterns::SignalPattern;
use eqi_core::{EegMetadata, EqiResult, Recording, RecordingCondition};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Noise configuration for realistic EEG simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Gaussian noise standard deviation (0.0 = no noise)
    pub gaussian_std: f64,
    /// Baseline wander amplitude (slow sub-1 Hz oscillation)
    pub baseline_wander: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gaussian_std: 2.0,
            baseline_wander: 1.0,
        }
    }
}

/// Powerline interference added on top of the deterministic patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerlineConfig {
    /// Mains frequency in Hz, typically 50 or 60
    pub frequency: f64,
    /// Interference amplitude
    pub amplitude: f64,
}

/// Configuration for EEG simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EegConfig {
    /// Recording condition to stamp on the output
    pub condition: RecordingCondition,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Number of channels to simulate
    pub channel_count: usize,
    /// Recording duration in seconds
    pub duration: f64,
    /// Deterministic waveform components, shared by all channels
    pub patterns: Vec<SignalPattern>,
    /// Noise configuration
    pub noise: NoiseConfig,
    /// Powerline interference (50/60 Hz)
    pub powerline: Option<PowerlineConfig>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl EegConfig {
    /// Clean resting-state recording: alpha rhythm plus mild noise
    pub fn resting(sampling_rate: f64, channel_count: usize, duration: f64) -> Self {
        EegConfig {
            condition: RecordingCondition::EyesOpen,
            sampling_rate,
            channel_count,
            duration,
            patterns: vec![SignalPattern::AlphaRhythm { amplitude: 20.0 }],
            noise: NoiseConfig::default(),
            powerline: None,
            seed: None,
        }
    }

    /// Pure Gaussian noise, no rhythms, no interference
    pub fn noise_only(
        sampling_rate: f64,
        channel_count: usize,
        duration: f64,
        gaussian_std: f64,
    ) -> Self {
        EegConfig {
            condition: RecordingCondition::Baseline,
            sampling_rate,
            channel_count,
            duration,
            patterns: Vec::new(),
            noise: NoiseConfig {
                gaussian_std,
                baseline_wander: 0.0,
            },
            powerline: None,
            seed: None,
        }
    }

    /// Degraded recording: resting activity buried under mains
    /// interference, heavier noise, and electrode drift
    pub fn degraded(sampling_rate: f64, channel_count: usize, duration: f64) -> Self {
        EegConfig {
            condition: RecordingCondition::Baseline,
            sampling_rate,
            channel_count,
            duration,
            patterns: vec![
                SignalPattern::AlphaRhythm { amplitude: 20.0 },
                SignalPattern::DriftRamp {
                    start_level: 0.0,
                    end_level: 30.0,
                    duration,
                },
            ],
            noise: NoiseConfig {
                gaussian_std: 8.0,
                baseline_wander: 4.0,
            },
            powerline: Some(PowerlineConfig {
                frequency: 60.0,
                amplitude: 15.0,
            }),
            seed: None,
        }
    }
}

/// Seeded EEG simulator producing `Recording` entities
pub struct EegSimulator {
    config: EegConfig,
    rng: StdRng,
}

impl EegSimulator {
    /// Create new simulator; the configuration is validated eagerly
    pub fn new(config: EegConfig) -> EqiResult<Self> {
        // Fail on bad rate/channel counts before generating anything
        EegMetadata::new(
            config.condition.clone(),
            config.sampling_rate,
            config.channel_count,
            config.duration,
        )?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(EegSimulator { config, rng })
    }

    /// Generate one recording
    ///
    /// Channels share the deterministic patterns but draw independent
    /// noise and wander phases, so no two channels are bit-identical.
    pub fn generate(&mut self) -> EqiResult<Recording> {
        let metadata = EegMetadata::new(
            self.config.condition.clone(),
            self.config.sampling_rate,
            self.config.channel_count,
            self.config.duration,
        )?;
        let samples = metadata.samples_per_channel();
        let dt = 1.0 / self.config.sampling_rate;

        let gaussian = if self.config.noise.gaussian_std > 0.0 {
            Some(Normal::new(0.0, self.config.noise.gaussian_std).map_err(|e| {
                eqi_core::EqiError::ConfigurationError {
                    message: format!("Invalid noise distribution: {}", e),
                }
            })?)
        } else {
            None
        };

        let mut channels = Vec::with_capacity(self.config.channel_count);
        for _ in 0..self.config.channel_count {
            let wander_phase: f64 = self.rng.gen_range(0.0..2.0 * PI);
            let mut channel = Vec::with_capacity(samples);

            for i in 0..samples {
                let t = i as f64 * dt;
                let mut value: f64 = self
                    .config
                    .patterns
                    .iter()
                    .map(|p| p.value_at_time(t))
                    .sum();

                if let Some(powerline) = &self.config.powerline {
                    value += powerline.amplitude
                        * (2.0 * PI * powerline.frequency * t).sin();
                }
                if self.config.noise.baseline_wander > 0.0 {
                    value += self.config.noise.baseline_wander
                        * (2.0 * PI * 0.3 * t + wander_phase).sin();
                }
                if let Some(gaussian) = &gaussian {
                    value += gaussian.sample(&mut self.rng);
                }

                channel.push(value);
            }
            channels.push(channel);
        }

        Recording::from_channels(channels, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_shape() {
        let config = EegConfig::resting(250.0, 4, 2.0);
        let recording = EegSimulator::new(config).unwrap().generate().unwrap();

        assert_eq!(recording.channel_count(), 4);
        assert_eq!(recording.samples_per_channel(), 500);
        assert_eq!(recording.sampling_rate(), 250.0);
    }

    #[test]
    fn test_seed_reproducibility() {
        let config = EegConfig {
            seed: Some(99),
            ..EegConfig::degraded(250.0, 2, 2.0)
        };
        let first = EegSimulator::new(config.clone()).unwrap().generate().unwrap();
        let second = EegSimulator::new(config).unwrap().generate().unwrap();

        assert_eq!(first.data, second.data);
    }

    #[test]
    fn test_channels_are_independent() {
        let config = EegConfig {
            seed: Some(5),
            ..EegConfig::resting(250.0, 2, 2.0)
        };
        let recording = EegSimulator::new(config).unwrap().generate().unwrap();

        assert_ne!(
            recording.channel_data(0).unwrap(),
            recording.channel_data(1).unwrap()
        );
    }

    #[test]
    fn test_noise_only_statistics() {
        let config = EegConfig {
            seed: Some(123),
            ..EegConfig::noise_only(250.0, 1, 20.0, 1.0)
        };
        let recording = EegSimulator::new(config).unwrap().generate().unwrap();
        let stats = recording.channel_stats(0).unwrap();

        assert!(stats.mean.abs() < 0.1);
        assert!((stats.std_dev - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EegConfig::resting(0.0, 1, 2.0);
        assert!(EegSimulator::new(config).is_err());
    }
}
