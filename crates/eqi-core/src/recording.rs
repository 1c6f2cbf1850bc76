//! Recording: core container for multichannel EEG data

use crate::eeg_types::EegMetadata;
use crate::error::{EqiError, EqiResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Container for one multichannel EEG recording
///
/// Data is stored channel-major: all samples of channel 0, then all
/// samples of channel 1, and so on. Channel order carries meaning — the
/// quality index compares channel i of the clean recording against
/// channel i of the test recording, so pairing must happen before
/// construction.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Unique identifier for this recording
    pub id: Uuid,
    /// EEG samples, channel-major
    pub data: Vec<f64>,
    /// Recording metadata
    pub metadata: EegMetadata,
    /// Creation timestamp
    pub created_at: u64,
}

impl Recording {
    /// Create new recording from channel-major data and metadata
    pub fn new(data: Vec<f64>, metadata: EegMetadata) -> EqiResult<Self> {
        let expected_samples = metadata.expected_samples();
        if data.len() != expected_samples {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Data length {} doesn't match expected {} samples",
                    data.len(),
                    expected_samples
                ),
            });
        }

        Ok(Recording {
            id: Uuid::new_v4(),
            data,
            metadata,
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_millis() as u64,
        })
    }

    /// Create new recording from per-channel sample vectors
    pub fn from_channels(channels: Vec<Vec<f64>>, metadata: EegMetadata) -> EqiResult<Self> {
        if channels.len() != metadata.channel_count {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Got {} channels, metadata declares {}",
                    channels.len(),
                    metadata.channel_count
                ),
            });
        }
        if let Some(ch) = channels.iter().find(|ch| ch.len() != channels[0].len()) {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Ragged channel lengths: {} vs {}",
                    ch.len(),
                    channels[0].len()
                ),
            });
        }

        let data = channels.into_iter().flatten().collect();
        Self::new(data, metadata)
    }

    /// Get total number of samples across all channels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the recording is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        if self.metadata.channel_count == 0 {
            0
        } else {
            self.data.len() / self.metadata.channel_count
        }
    }

    /// Borrow the samples of a single channel
    pub fn channel_data(&self, channel_index: usize) -> EqiResult<&[f64]> {
        if channel_index >= self.metadata.channel_count {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Channel index {} out of bounds (0-{})",
                    channel_index,
                    self.metadata.channel_count - 1
                ),
            });
        }

        let samples = self.samples_per_channel();
        let start = channel_index * samples;
        Ok(&self.data[start..start + samples])
    }

    /// Borrow all channels as slices
    pub fn all_channels(&self) -> Vec<&[f64]> {
        (0..self.metadata.channel_count)
            .map(|ch| {
                let samples = self.samples_per_channel();
                &self.data[ch * samples..(ch + 1) * samples]
            })
            .collect()
    }

    /// Get recording duration in seconds
    pub fn duration(&self) -> f64 {
        self.metadata.duration
    }

    /// Get sampling rate
    pub fn sampling_rate(&self) -> f64 {
        self.metadata.sampling_rate
    }

    /// Get channel count
    pub fn channel_count(&self) -> usize {
        self.metadata.channel_count
    }

    /// Get channel labels
    pub fn channel_names(&self) -> &[String] {
        &self.metadata.channel_names
    }

    /// Get time vector for plotting
    pub fn time_vector(&self) -> Vec<f64> {
        let samples = self.samples_per_channel();
        let dt = 1.0 / self.metadata.sampling_rate;

        (0..samples).map(|i| i as f64 * dt).collect()
    }

    /// Calculate basic statistics for a channel
    pub fn channel_stats(&self, channel_index: usize) -> EqiResult<ChannelStats> {
        let data = self.channel_data(channel_index)?;
        Ok(ChannelStats::calculate(data))
    }

    /// Crop the recording to a time range, producing a new entity
    ///
    /// Both recordings are usually cropped to a common analysis interval
    /// before scoring so that transients at the start of a session do not
    /// dominate the clean distribution.
    pub fn crop(&self, start_time: f64, end_time: f64) -> EqiResult<Recording> {
        if start_time < 0.0 || end_time > self.duration() || start_time >= end_time {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Invalid time range [{:.3}, {:.3}]s for recording duration {:.3}s",
                    start_time, end_time, self.duration()
                ),
            });
        }

        let start_sample = (start_time * self.metadata.sampling_rate) as usize;
        let end_sample = (end_time * self.metadata.sampling_rate) as usize;
        let samples = self.samples_per_channel();

        let mut cropped = Vec::with_capacity((end_sample - start_sample) * self.metadata.channel_count);
        for ch in 0..self.metadata.channel_count {
            let base = ch * samples;
            cropped.extend_from_slice(&self.data[base + start_sample..base + end_sample]);
        }

        let mut new_metadata = self.metadata.clone();
        new_metadata.duration = (end_sample - start_sample) as f64 / self.metadata.sampling_rate;

        Recording::new(cropped, new_metadata)
    }
}

/// Basic statistics for a recording channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl ChannelStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let n = data.len() as f64;
        let sum: f64 = data.iter().sum();
        let mean = sum / n;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / n).sqrt();

        let variance: f64 = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let peak_to_peak = max - min;

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak,
        }
    }
}
