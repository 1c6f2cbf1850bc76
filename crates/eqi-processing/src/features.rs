//! Per-window feature extraction for quality scoring

use crate::config::FrequencyBand;
use crate::spectral::AmplitudeSpectrum;
use crate::window::WindowedSignal;
use eqi_core::{EqiError, EqiResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of quality features computed per window per channel
pub const FEATURE_COUNT: usize = 6;

/// The six quality metrics, in fixed row order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityFeature {
    /// Mean single-sided amplitude spectrum over the broadband range
    BroadbandAmplitude,
    /// Mean single-sided amplitude spectrum over the line-noise band
    LineNoiseAmplitude,
    /// Root-mean-square amplitude of the raw samples
    RmsAmplitude,
    /// Maximum signed first difference of the raw samples
    MaxGradient,
    /// Mean of the first difference of the sign sequence
    ZeroCrossingRate,
    /// Excess kurtosis (Fisher) of the raw samples
    Kurtosis,
}

impl QualityFeature {
    /// All features in row order
    pub const ALL: [QualityFeature; FEATURE_COUNT] = [
        QualityFeature::BroadbandAmplitude,
        QualityFeature::LineNoiseAmplitude,
        QualityFeature::RmsAmplitude,
        QualityFeature::MaxGradient,
        QualityFeature::ZeroCrossingRate,
        QualityFeature::Kurtosis,
    ];

    /// Row index of this feature in feature and score matrices
    pub fn index(&self) -> usize {
        match self {
            QualityFeature::BroadbandAmplitude => 0,
            QualityFeature::LineNoiseAmplitude => 1,
            QualityFeature::RmsAmplitude => 2,
            QualityFeature::MaxGradient => 3,
            QualityFeature::ZeroCrossingRate => 4,
            QualityFeature::Kurtosis => 5,
        }
    }

    /// Row label for tabular rendering
    pub fn label(&self) -> &'static str {
        match self {
            QualityFeature::BroadbandAmplitude => "SSAS 1-50 Hz",
            QualityFeature::LineNoiseAmplitude => "SSAS 59-61 Hz",
            QualityFeature::RmsAmplitude => "RMS",
            QualityFeature::MaxGradient => "Max gradient",
            QualityFeature::ZeroCrossingRate => "ZCR",
            QualityFeature::Kurtosis => "Kurtosis",
        }
    }
}

/// Feature values for one recording: channels × 6 features × windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    data: Vec<f64>,
    channel_count: usize,
    window_count: usize,
}

impl FeatureMatrix {
    /// Create a zero-filled feature matrix
    pub fn zeros(channel_count: usize, window_count: usize) -> Self {
        FeatureMatrix {
            data: vec![0.0; channel_count * FEATURE_COUNT * window_count],
            channel_count,
            window_count,
        }
    }

    /// Get number of channels
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Get number of windows
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    /// Tensor shape as (channels, features, windows)
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channel_count, FEATURE_COUNT, self.window_count)
    }

    fn offset(&self, channel: usize, feature: QualityFeature) -> usize {
        (channel * FEATURE_COUNT + feature.index()) * self.window_count
    }

    /// Get one feature value
    pub fn value(&self, channel: usize, feature: QualityFeature, window: usize) -> f64 {
        debug_assert!(channel < self.channel_count && window < self.window_count);
        self.data[self.offset(channel, feature) + window]
    }

    /// Set one feature value
    pub fn set(&mut self, channel: usize, feature: QualityFeature, window: usize, value: f64) {
        debug_assert!(channel < self.channel_count && window < self.window_count);
        let idx = self.offset(channel, feature) + window;
        self.data[idx] = value;
    }

    /// Borrow all window values of one feature for one channel
    pub fn values(&self, channel: usize, feature: QualityFeature) -> &[f64] {
        let start = self.offset(channel, feature);
        &self.data[start..start + self.window_count]
    }
}

/// Extracts the six quality features from windowed data and its spectrum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureExtractor {
    /// Broadband spectral range, nominally 1-50 Hz
    pub broadband: FrequencyBand,
    /// Powerline interference range, nominally 59-61 Hz
    pub line_noise: FrequencyBand,
}

impl FeatureExtractor {
    /// Create extractor with explicit band definitions
    pub fn new(broadband: FrequencyBand, line_noise: FrequencyBand) -> Self {
        FeatureExtractor {
            broadband,
            line_noise,
        }
    }

    /// Compute all six features for every window of every channel
    ///
    /// The two spectral features reduce over bin ranges resolved once per
    /// band. A band with no bin in the spectrum (resolution too coarse,
    /// or band beyond Nyquist) makes that feature undetermined: every
    /// window gets NaN, one warning is logged, and extraction continues.
    /// NaN scores downstream mean "undetermined", never "clean".
    pub fn extract(
        &self,
        windows: &WindowedSignal,
        spectrum: &AmplitudeSpectrum,
    ) -> EqiResult<FeatureMatrix> {
        let (channel_count, _, window_count) = windows.shape();
        if spectrum.channel_count() != channel_count || spectrum.window_count() != window_count {
            return Err(EqiError::InvalidSignalData {
                reason: format!(
                    "Spectrum shape ({}, {}) does not match windowed signal ({}, {})",
                    spectrum.channel_count(),
                    spectrum.window_count(),
                    channel_count,
                    window_count
                ),
            });
        }

        let mut features = FeatureMatrix::zeros(channel_count, window_count);

        let broadband_range = self.resolve_band(spectrum, &self.broadband);
        let line_range = self.resolve_band(spectrum, &self.line_noise);

        for ch in 0..channel_count {
            for w in 0..window_count {
                let samples = windows.window(ch, w);

                let broadband = match broadband_range {
                    Some(range) => spectrum.range_mean(ch, w, range),
                    None => f64::NAN,
                };
                let line = match line_range {
                    Some(range) => spectrum.range_mean(ch, w, range),
                    None => f64::NAN,
                };

                features.set(ch, QualityFeature::BroadbandAmplitude, w, broadband);
                features.set(ch, QualityFeature::LineNoiseAmplitude, w, line);
                features.set(ch, QualityFeature::RmsAmplitude, w, rms(samples));
                features.set(ch, QualityFeature::MaxGradient, w, max_gradient(samples));
                features.set(ch, QualityFeature::ZeroCrossingRate, w, zero_crossing_rate(samples));
                features.set(ch, QualityFeature::Kurtosis, w, kurtosis(samples));
            }
        }

        Ok(features)
    }

    fn resolve_band(
        &self,
        spectrum: &AmplitudeSpectrum,
        band: &FrequencyBand,
    ) -> Option<(usize, usize)> {
        match spectrum.band_range(band) {
            Ok(range) => Some(range),
            Err(_) => {
                warn!(
                    band = %band.name,
                    low_hz = band.low_hz,
                    high_hz = band.high_hz,
                    resolution_hz = spectrum.resolution_hz(),
                    "frequency band has no spectral bin, feature is undetermined"
                );
                None
            }
        }
    }
}

/// Root-mean-square amplitude over raw window samples
pub fn rms(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    (samples.iter().map(|x| x * x).sum::<f64>() / n).sqrt()
}

/// Maximum signed first difference over raw window samples
///
/// The maximum is over the signed deltas, not their absolute values; a
/// window needs at least two samples to have a gradient. A NaN delta
/// makes the whole gradient NaN — `f64::max` would silently discard it.
pub fn max_gradient(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return f64::NAN;
    }
    let mut max = f64::NEG_INFINITY;
    for pair in samples.windows(2) {
        let delta = pair[1] - pair[0];
        if delta.is_nan() {
            return f64::NAN;
        }
        if delta > max {
            max = delta;
        }
    }
    max
}

/// Mean of the first difference of the sign sequence
///
/// A signed rate in [-2, 2]. The formula is kept exactly for
/// compatibility with existing EQI baselines even though the name
/// understates it: this is a magnitude-of-change proxy over the sign
/// pattern, not a literal crossing count, and it only depends on where
/// the signal changes sign.
pub fn zero_crossing_rate(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return f64::NAN;
    }
    let sum: f64 = samples
        .windows(2)
        .map(|pair| sign(pair[1]) - sign(pair[0]))
        .sum();
    sum / (samples.len() - 1) as f64
}

/// Excess kurtosis (Fisher definition, normal ≡ 0) from population moments
///
/// A zero-variance window reports 0.0 rather than dividing by zero.
pub fn kurtosis(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;

    let mut m2 = 0.0;
    let mut m4 = 0.0;
    for &x in samples {
        let diff = x - mean;
        let diff2 = diff * diff;
        m2 += diff2;
        m4 += diff2 * diff2;
    }
    m2 /= n;
    m4 /= n;

    if m2 == 0.0 {
        0.0
    } else {
        m4 / (m2 * m2) - 3.0
    }
}

/// Sign of a sample: 1 for positive, -1 for negative, 0 at zero, NaN kept
///
/// `f64::signum` maps ±0 to ±1, which would silently alter the
/// zero-crossing statistic on zero-padded or clipped data.
fn sign(x: f64) -> f64 {
    if x.is_nan() {
        f64::NAN
    } else if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
