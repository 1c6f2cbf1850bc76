//! Quality index orchestration: windowing through scoring

use crate::config::{EqiConfig, SegmentSpec};
use crate::features::{FeatureExtractor, FeatureMatrix, QualityFeature};
use crate::scoring::{PercentMatrix, ScoreMatrix, Scorer};
use crate::spectral::SpectralEstimator;
use crate::window::sliding_window;
use eqi_core::{EqiError, EqiResult, Recording};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete result of one quality index evaluation
///
/// Everything an external table or heatmap renderer needs: the raw
/// feature tensors for both recordings, the score and percent matrices,
/// and the row/column labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqiReport {
    /// Raw feature values of the clean recording
    pub clean_features: FeatureMatrix,
    /// Raw feature values of the test recording
    pub test_features: FeatureMatrix,
    /// Deviation scores, 6 features × channels, each in [0, 100]
    pub scores: ScoreMatrix,
    /// Scores with the appended cross-channel mean column
    pub percent: PercentMatrix,
    /// Per-feature cross-channel means
    pub mean_scores: Vec<f64>,
    /// Feature row labels
    pub feature_labels: Vec<String>,
    /// Channel column labels (clean-side names; pairing is external)
    pub channel_labels: Vec<String>,
    /// Condition of the clean recording
    pub clean_condition: String,
    /// Condition of the test recording
    pub test_condition: String,
}

impl EqiReport {
    /// Column labels for the percent matrix: channels plus the mean
    pub fn column_labels(&self) -> Vec<String> {
        let mut labels = self.channel_labels.clone();
        labels.push("Mean".to_string());
        labels
    }

    /// Serialize the report for downstream rendering
    pub fn to_json(&self) -> EqiResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EqiError::InvalidSignalData {
            reason: format!("Report serialization failed: {}", e),
        })
    }
}

/// The quality index engine
///
/// Sequences windowing, spectral estimation, and feature extraction for
/// both recordings and drives the scorer. Owns no state that outlives a
/// call — the cached FFT planner only avoids re-planning, and identical
/// inputs always produce bit-identical reports.
pub struct QualityIndex {
    config: EqiConfig,
    estimator: SpectralEstimator,
    extractor: FeatureExtractor,
    scorer: Scorer,
}

impl QualityIndex {
    /// Create an engine from a validated configuration
    pub fn new(config: EqiConfig) -> EqiResult<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::new(config.broadband.clone(), config.line_noise.clone());
        let scorer = Scorer::new(config.scoring.clone())?;

        Ok(QualityIndex {
            config,
            estimator: SpectralEstimator::new(),
            extractor,
            scorer,
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &EqiConfig {
        &self.config
    }

    /// Evaluate the quality index of a test recording against a clean one
    ///
    /// Channel counts must already match through external pairing; the
    /// sampling rates may differ, in which case each recording is
    /// windowed by its own segmentation spec and transformed at its own
    /// FFT length (round(rate), i.e. 1 Hz resolution).
    pub fn evaluate(&mut self, clean: &Recording, test: &Recording) -> EqiResult<EqiReport> {
        if clean.channel_count() != test.channel_count() {
            return Err(EqiError::ChannelMismatch {
                clean: clean.channel_count(),
                test: test.channel_count(),
            });
        }

        debug!(
            clean_channels = clean.channel_count(),
            clean_rate = clean.sampling_rate(),
            test_rate = test.sampling_rate(),
            "evaluating quality index"
        );

        let clean_features = self.analyze(clean, self.config.clean_segmentation)?;
        let test_features = self.analyze(test, self.config.test_segmentation)?;

        let outcome = self.scorer.score(&clean_features, &test_features)?;
        debug!(mean_scores = ?outcome.mean_scores, "scoring complete");

        Ok(EqiReport {
            clean_features,
            test_features,
            scores: outcome.scores,
            percent: outcome.percent,
            mean_scores: outcome.mean_scores,
            feature_labels: QualityFeature::ALL
                .iter()
                .map(|f| f.label().to_string())
                .collect(),
            channel_labels: clean.channel_names().to_vec(),
            clean_condition: clean.metadata.condition.to_string(),
            test_condition: test.metadata.condition.to_string(),
        })
    }

    /// Window one recording, estimate its spectra, extract its features
    fn analyze(&mut self, recording: &Recording, seg: SegmentSpec) -> EqiResult<FeatureMatrix> {
        let windows = sliding_window(recording, seg.window, seg.stride)?;
        debug!(
            windows = windows.window_count(),
            window_len = seg.window,
            stride = seg.stride,
            "windowed recording"
        );

        // One independent spectral estimate per 1-second-equivalent window
        let fft_len = recording.sampling_rate().round() as usize;
        let spectrum =
            self.estimator
                .amplitude_spectrum(&windows, recording.sampling_rate(), fft_len)?;

        self.extractor.extract(&windows, &spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eqi_core::{EegMetadata, RecordingCondition};
    use eqi_simulation::{EegConfig, EegSimulator};
    use std::f64::consts::PI;

    /// Sine recording built by tiling one exact period, so windows that
    /// start on a period boundary carry bit-identical samples
    fn sine_recording(channels: usize, freq: f64, rate: f64, duration: f64) -> Recording {
        let samples = (rate * duration) as usize;
        let period = (rate / freq) as usize;
        let metadata =
            EegMetadata::new(RecordingCondition::Baseline, rate, channels, duration).unwrap();
        let channel: Vec<f64> = (0..samples)
            .map(|i| (2.0 * PI * freq * ((i % period) as f64) / rate).sin())
            .collect();
        Recording::from_channels(vec![channel; channels], metadata).unwrap()
    }

    #[test]
    fn test_channel_mismatch() {
        let clean = sine_recording(2, 10.0, 250.0, 4.0);
        let test = sine_recording(1, 10.0, 250.0, 4.0);
        let mut engine = QualityIndex::new(EqiConfig::uniform(250, 25)).unwrap();

        let result = engine.evaluate(&clean, &test);
        assert!(matches!(
            result,
            Err(EqiError::ChannelMismatch { clean: 2, test: 1 })
        ));
    }

    #[test]
    fn test_self_comparison_scores_zero() {
        // 10 Hz at 250 Hz: period 25 samples. Window 250 and stride 25
        // land every window on the same phase, so all windows carry the
        // same values and every test value equals its distribution mean.
        let rec = sine_recording(2, 10.0, 250.0, 4.0);
        let mut engine = QualityIndex::new(EqiConfig::uniform(250, 25)).unwrap();

        let report = engine.evaluate(&rec, &rec).unwrap();
        for feature in QualityFeature::ALL {
            for ch in 0..2 {
                assert_eq!(
                    report.scores.value(feature, ch),
                    0.0,
                    "feature {:?} channel {} not at baseline",
                    feature,
                    ch
                );
            }
        }
        assert!(report.mean_scores.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_determinism() {
        let config = EegConfig {
            seed: Some(11),
            ..EegConfig::resting(250.0, 2, 8.0)
        };
        let clean = EegSimulator::new(config.clone()).unwrap().generate().unwrap();
        let test = EegSimulator::new(EegConfig { seed: Some(12), ..config })
            .unwrap()
            .generate()
            .unwrap();

        let mut engine = QualityIndex::new(EqiConfig::uniform(125, 10)).unwrap();
        let first = engine.evaluate(&clean, &test).unwrap();
        let second = engine.evaluate(&clean, &test).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_line_noise_injection_scenario() {
        // Clean: alpha rhythm plus seeded noise on both channels. Test:
        // the same samples with a strong 60 Hz sinusoid added to channel
        // 1 only. The injected channel's line-noise score must saturate
        // while its broadband score stays at the baseline the identical
        // samples produce.
        let config = EegConfig {
            seed: Some(7),
            ..EegConfig::resting(250.0, 2, 12.0)
        };
        let clean = EegSimulator::new(config).unwrap().generate().unwrap();

        let rate = clean.sampling_rate();
        let ch0 = clean.channel_data(0).unwrap().to_vec();
        let ch1: Vec<f64> = clean
            .channel_data(1)
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, &x)| x + 50.0 * (2.0 * PI * 60.0 * i as f64 / rate).sin())
            .collect();
        let test = Recording::from_channels(
            vec![ch0, ch1],
            EegMetadata::new(RecordingCondition::Baseline, rate, 2, clean.duration()).unwrap(),
        )
        .unwrap();

        let mut engine = QualityIndex::new(EqiConfig::uniform(250, 50)).unwrap();
        let report = engine.evaluate(&clean, &test).unwrap();

        let line = QualityFeature::LineNoiseAmplitude;
        let broadband = QualityFeature::BroadbandAmplitude;

        assert_eq!(report.scores.value(line, 1), 100.0);
        // Untouched channel: identical samples, scores stay at baseline
        assert!(report.scores.value(line, 0) < 30.0);
        assert!(report.scores.value(broadband, 1) < 30.0);
        assert!(report.scores.value(broadband, 0) < 30.0);
    }

    #[test]
    fn test_different_sampling_rates() {
        let clean = sine_recording(2, 10.0, 500.0, 4.0);
        let test = sine_recording(2, 10.0, 250.0, 4.0);

        let mut engine = QualityIndex::new(EqiConfig::rate_matched(500.0, 250.0)).unwrap();
        let report = engine.evaluate(&clean, &test).unwrap();

        // floor((2000 - 250) / 10) + 1 and floor((1000 - 125) / 10) + 1
        assert_eq!(report.clean_features.window_count(), 176);
        assert_eq!(report.test_features.window_count(), 88);
        assert_eq!(report.scores.channel_count(), 2);
    }

    #[test]
    fn test_report_labels_and_json() {
        let rec = sine_recording(2, 10.0, 250.0, 4.0);
        let mut engine = QualityIndex::new(EqiConfig::uniform(250, 25)).unwrap();
        let report = engine.evaluate(&rec, &rec).unwrap();

        assert_eq!(report.feature_labels.len(), 6);
        assert_eq!(report.feature_labels[0], "SSAS 1-50 Hz");
        assert_eq!(report.column_labels(), vec!["Ch1", "Ch2", "Mean"]);

        let json = report.to_json().unwrap();
        let restored: EqiReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, restored);
    }
}
