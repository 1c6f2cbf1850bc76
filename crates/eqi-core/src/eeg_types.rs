//! EEG-specific recording types and metadata

use serde::{Deserialize, Serialize};
use crate::error::{EqiError, EqiResult};

/// Recording condition under which an EEG trace was captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordingCondition {
    /// Raw baseline recording, no task
    Baseline,
    /// Resting with eyes open
    EyesOpen,
    /// Resting with eyes closed
    EyesClosed,
    /// Task-evoked recording
    Task {
        /// Free-form task description
        name: String,
    },
    Other(u8), // For extensibility
}

/// EEG recording metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EegMetadata {
    /// Recording condition
    pub condition: RecordingCondition,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Number of channels
    pub channel_count: usize,
    /// Channel labels, one per channel, in paired order
    pub channel_names: Vec<String>,
    /// Recording duration in seconds
    pub duration: f64,
    /// Creation timestamp
    pub timestamp: u64,
}

impl EegMetadata {
    /// Create new EEG metadata with generated channel labels
    pub fn new(
        condition: RecordingCondition,
        sampling_rate: f64,
        channel_count: usize,
        duration: f64,
    ) -> EqiResult<Self> {
        let channel_names = (1..=channel_count).map(|i| format!("Ch{}", i)).collect();
        Self::with_channel_names(condition, sampling_rate, channel_names, duration)
    }

    /// Create new EEG metadata with explicit channel labels
    pub fn with_channel_names(
        condition: RecordingCondition,
        sampling_rate: f64,
        channel_names: Vec<String>,
        duration: f64,
    ) -> EqiResult<Self> {
        Self::validate_sampling_rate(sampling_rate)?;
        Self::validate_channel_count(channel_names.len())?;

        if duration <= 0.0 {
            return Err(EqiError::InvalidSignalData {
                reason: "Duration must be positive".to_string(),
            });
        }

        Ok(EegMetadata {
            condition,
            sampling_rate,
            channel_count: channel_names.len(),
            channel_names,
            duration,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_millis() as u64,
        })
    }

    /// Validate sampling rate for EEG recordings
    pub fn validate_sampling_rate(rate: f64) -> EqiResult<()> {
        const MIN_RATE: f64 = 1.0;
        const MAX_RATE: f64 = 30_000.0;

        if !rate.is_finite() || rate < MIN_RATE || rate > MAX_RATE {
            Err(EqiError::InvalidSamplingRate {
                rate,
                valid_range: format!("{}-{}Hz", MIN_RATE, MAX_RATE),
            })
        } else {
            Ok(())
        }
    }

    /// Validate channel count for EEG recordings
    pub fn validate_channel_count(count: usize) -> EqiResult<()> {
        const MAX_CHANNELS: usize = 256;

        if count == 0 || count > MAX_CHANNELS {
            Err(EqiError::InvalidChannelCount {
                count,
                max: MAX_CHANNELS,
            })
        } else {
            Ok(())
        }
    }

    /// Get expected number of samples per channel for this recording
    pub fn samples_per_channel(&self) -> usize {
        (self.sampling_rate * self.duration).round() as usize
    }

    /// Get expected total sample count across all channels
    pub fn expected_samples(&self) -> usize {
        self.samples_per_channel() * self.channel_count
    }
}

impl Default for EegMetadata {
    fn default() -> Self {
        EegMetadata {
            condition: RecordingCondition::Baseline,
            sampling_rate: 250.0,
            channel_count: 1,
            channel_names: vec!["Ch1".to_string()],
            duration: 1.0,
            timestamp: 0,
        }
    }
}

impl std::fmt::Display for RecordingCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingCondition::Baseline => write!(f, "Baseline"),
            RecordingCondition::EyesOpen => write!(f, "Eyes open"),
            RecordingCondition::EyesClosed => write!(f, "Eyes closed"),
            RecordingCondition::Task { name } => write!(f, "Task: {}", name),
            RecordingCondition::Other(id) => write!(f, "Other({})", id),
        }
    }
}
