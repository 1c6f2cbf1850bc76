//! Configuration for quality index evaluation

use crate::scoring::ScoringConfig;
use eqi_core::{EqiError, EqiResult};
use serde::{Deserialize, Serialize};

/// Frequency band definition for spectral reductions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub name: String,
    pub low_hz: f64,
    pub high_hz: f64,
}

impl FrequencyBand {
    /// Create a named frequency band
    pub fn new(name: &str, low_hz: f64, high_hz: f64) -> Self {
        FrequencyBand {
            name: name.to_string(),
            low_hz,
            high_hz,
        }
    }

    /// Broadband EEG range used for the average-amplitude feature
    pub fn broadband() -> Self {
        Self::new("broadband", 1.0, 50.0)
    }

    /// Powerline interference band for 60 Hz mains
    pub fn line_noise_60hz() -> Self {
        Self::new("line noise 60 Hz", 59.0, 61.0)
    }

    /// Powerline interference band for 50 Hz mains
    pub fn line_noise_50hz() -> Self {
        Self::new("line noise 50 Hz", 49.0, 51.0)
    }

    /// Validate band ordering
    pub fn validate(&self) -> EqiResult<()> {
        if !self.low_hz.is_finite() || !self.high_hz.is_finite() {
            return Err(EqiError::ConfigurationError {
                message: format!("Band '{}' has non-finite edges", self.name),
            });
        }
        if self.low_hz < 0.0 || self.high_hz < self.low_hz {
            return Err(EqiError::ConfigurationError {
                message: format!(
                    "Band '{}' edges [{}, {}] must satisfy 0 <= low <= high",
                    self.name, self.low_hz, self.high_hz
                ),
            });
        }
        Ok(())
    }
}

/// Window length and stride for one recording, in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// Window length in samples
    pub window: usize,
    /// Slide between consecutive window starts, in samples
    pub stride: usize,
}

impl SegmentSpec {
    /// Create a segmentation spec
    pub fn new(window: usize, stride: usize) -> Self {
        SegmentSpec { window, stride }
    }

    /// Validate that window and stride are positive
    pub fn validate(&self) -> EqiResult<()> {
        if self.window == 0 || self.stride == 0 {
            return Err(EqiError::ConfigurationError {
                message: format!(
                    "Window {} and stride {} must be positive",
                    self.window, self.stride
                ),
            });
        }
        Ok(())
    }
}

/// Full configuration for one quality index evaluation
///
/// Clean and test recordings carry separate segmentation specs so that
/// recordings with different sampling rates can be windowed over the
/// same time span (e.g. half-second windows on both sides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqiConfig {
    /// Segmentation for the clean recording
    pub clean_segmentation: SegmentSpec,
    /// Segmentation for the test recording
    pub test_segmentation: SegmentSpec,
    /// Broadband spectral feature range
    pub broadband: FrequencyBand,
    /// Line-noise spectral feature range
    pub line_noise: FrequencyBand,
    /// Deviation tier table
    pub scoring: ScoringConfig,
}

impl EqiConfig {
    /// Same window and stride for both recordings
    pub fn uniform(window: usize, stride: usize) -> Self {
        Self::per_recording(SegmentSpec::new(window, stride), SegmentSpec::new(window, stride))
    }

    /// Separate segmentation per recording
    pub fn per_recording(clean: SegmentSpec, test: SegmentSpec) -> Self {
        EqiConfig {
            clean_segmentation: clean,
            test_segmentation: test,
            broadband: FrequencyBand::broadband(),
            line_noise: FrequencyBand::line_noise_60hz(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Half-second windows matched to each recording's sampling rate
    ///
    /// The conventional setup for comparing recordings with different
    /// rates: window = rate / 2 samples on each side, 10-sample slide.
    pub fn rate_matched(clean_rate: f64, test_rate: f64) -> Self {
        Self::per_recording(
            SegmentSpec::new((clean_rate / 2.0) as usize, 10),
            SegmentSpec::new((test_rate / 2.0) as usize, 10),
        )
    }

    /// Validate every nested component
    pub fn validate(&self) -> EqiResult<()> {
        self.clean_segmentation.validate()?;
        self.test_segmentation.validate()?;
        self.broadband.validate()?;
        self.line_noise.validate()?;
        self.scoring.validate()?;
        Ok(())
    }
}
