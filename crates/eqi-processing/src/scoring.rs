//! Deviation scoring of test features against the clean distribution

use crate::features::{FeatureMatrix, QualityFeature, FEATURE_COUNT};
use eqi_core::{EqiError, EqiResult};
use serde::{Deserialize, Serialize};

/// Relative tolerance deciding "σ is zero" and "x equals μ"
///
/// Reducing a distribution of identical values in floating point leaves
/// ulp-level residue in both σ and |x − μ|; comparing against a scaled
/// tolerance instead of literal zero keeps self-comparison at tier 0.
const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// One step of the deviation tier table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    /// Upper deviation bound for this tier, in multiples of σ (inclusive)
    pub max_sigma: f64,
    /// Score assigned when the deviation falls within this tier
    pub score: f64,
}

/// Tier table mapping σ-distance to a 0-100 score
///
/// The default table:
///
/// | deviation          | score |
/// |--------------------|-------|
/// | &#124;x − μ&#124; ≤ 1σ      | 0     |
/// | 1σ < &#124;x − μ&#124; ≤ 2σ | 25    |
/// | 2σ < &#124;x − μ&#124; ≤ 3σ | 50    |
/// | 3σ < &#124;x − μ&#124; ≤ 4σ | 75    |
/// | beyond 4σ          | 100   |
///
/// Boundaries are inclusive on the lower tier: a deviation of exactly 1σ
/// scores 0. The same table applies to every feature and every channel.
/// Per-channel, per-feature scores aggregate as the arithmetic mean of
/// the per-window tier scores across all test windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Ascending tier steps
    pub tiers: Vec<ScoreTier>,
    /// Score beyond the last tier
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            tiers: vec![
                ScoreTier { max_sigma: 1.0, score: 0.0 },
                ScoreTier { max_sigma: 2.0, score: 25.0 },
                ScoreTier { max_sigma: 3.0, score: 50.0 },
                ScoreTier { max_sigma: 4.0, score: 75.0 },
            ],
            max_score: 100.0,
        }
    }
}

impl ScoringConfig {
    /// Validate that the tier table is a monotonic step function
    pub fn validate(&self) -> EqiResult<()> {
        if self.tiers.is_empty() {
            return Err(EqiError::ConfigurationError {
                message: "Tier table must not be empty".to_string(),
            });
        }
        for pair in self.tiers.windows(2) {
            if pair[1].max_sigma <= pair[0].max_sigma || pair[1].score < pair[0].score {
                return Err(EqiError::ConfigurationError {
                    message: "Tier table must be strictly ascending in sigma and monotonic in score"
                        .to_string(),
                });
            }
        }
        if self.tiers.iter().any(|t| !(0.0..=self.max_score).contains(&t.score)) {
            return Err(EqiError::ConfigurationError {
                message: "Tier scores must lie within [0, max_score]".to_string(),
            });
        }
        Ok(())
    }

    /// Classify one test value against a clean distribution
    ///
    /// Non-finite inputs yield NaN (undetermined). A degenerate clean
    /// distribution (σ ≈ 0) scores 0 when the value matches μ and the
    /// maximum otherwise; no division takes place anywhere.
    pub fn classify(&self, value: f64, mean: f64, std_dev: f64) -> f64 {
        if !value.is_finite() || !mean.is_finite() || !std_dev.is_finite() {
            return f64::NAN;
        }

        let deviation = (value - mean).abs();
        let tolerance = DEGENERACY_TOLERANCE * mean.abs().max(1.0);

        if std_dev <= tolerance {
            return if deviation <= tolerance { self.tiers[0].score } else { self.max_score };
        }

        for tier in &self.tiers {
            if deviation <= tier.max_sigma * std_dev {
                return tier.score;
            }
        }
        self.max_score
    }
}

/// Aggregated deviation scores: 6 features × channels, each in [0, 100]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    data: Vec<f64>,
    channel_count: usize,
}

impl ScoreMatrix {
    fn zeros(channel_count: usize) -> Self {
        ScoreMatrix {
            data: vec![0.0; FEATURE_COUNT * channel_count],
            channel_count,
        }
    }

    /// Get number of channel columns
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Get the score for one feature on one channel
    pub fn value(&self, feature: QualityFeature, channel: usize) -> f64 {
        debug_assert!(channel < self.channel_count);
        self.data[feature.index() * self.channel_count + channel]
    }

    fn set(&mut self, feature: QualityFeature, channel: usize, value: f64) {
        self.data[feature.index() * self.channel_count + channel] = value;
    }

    /// Borrow one feature row across channels
    pub fn row(&self, feature: QualityFeature) -> &[f64] {
        let start = feature.index() * self.channel_count;
        &self.data[start..start + self.channel_count]
    }
}

/// Score matrix with an appended per-feature cross-channel mean column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentMatrix {
    data: Vec<f64>,
    column_count: usize,
}

impl PercentMatrix {
    /// Get number of columns (channels + 1 mean column)
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Get one cell; the last column is the cross-channel mean
    pub fn value(&self, feature: QualityFeature, column: usize) -> f64 {
        debug_assert!(column < self.column_count);
        self.data[feature.index() * self.column_count + column]
    }

    /// Borrow one feature row, mean column included
    pub fn row(&self, feature: QualityFeature) -> &[f64] {
        let start = feature.index() * self.column_count;
        &self.data[start..start + self.column_count]
    }
}

/// Result of scoring a test feature matrix against a clean one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Per-feature, per-channel deviation scores in [0, 100]
    pub scores: ScoreMatrix,
    /// Scores with the appended cross-channel mean column
    pub percent: PercentMatrix,
    /// Per-feature cross-channel means (the appended column)
    pub mean_scores: Vec<f64>,
}

/// Compares test feature distributions against clean baselines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    /// Create a scorer with the given tier table
    pub fn new(config: ScoringConfig) -> EqiResult<Self> {
        config.validate()?;
        Ok(Scorer { config })
    }

    /// Score every test window against the clean distribution
    ///
    /// For each feature and channel the clean windows define μ and σ
    /// (population); each test window is classified by the tier table
    /// and the per-window scores are averaged. NaN feature values poison
    /// the corresponding mean: the score is undetermined, not zero.
    pub fn score(
        &self,
        clean_features: &FeatureMatrix,
        test_features: &FeatureMatrix,
    ) -> EqiResult<ScoreOutcome> {
        let channel_count = clean_features.channel_count();
        if test_features.channel_count() != channel_count {
            return Err(EqiError::ChannelMismatch {
                clean: channel_count,
                test: test_features.channel_count(),
            });
        }
        if clean_features.window_count() == 0 {
            return Err(EqiError::NumericDegeneracy {
                reason: "clean recording produced no windows to form a distribution".to_string(),
            });
        }
        if test_features.window_count() == 0 {
            return Err(EqiError::NumericDegeneracy {
                reason: "test recording produced no windows to score".to_string(),
            });
        }

        let mut scores = ScoreMatrix::zeros(channel_count);

        for feature in QualityFeature::ALL {
            for ch in 0..channel_count {
                let clean = clean_features.values(ch, feature);
                let (mean, std_dev) = population_stats(clean);

                let test = test_features.values(ch, feature);
                let total: f64 = test
                    .iter()
                    .map(|&x| self.config.classify(x, mean, std_dev))
                    .sum();
                scores.set(feature, ch, total / test.len() as f64);
            }
        }

        let column_count = channel_count + 1;
        let mut percent = Vec::with_capacity(FEATURE_COUNT * column_count);
        let mut mean_scores = Vec::with_capacity(FEATURE_COUNT);
        for feature in QualityFeature::ALL {
            let row = scores.row(feature);
            let mean = row.iter().sum::<f64>() / channel_count as f64;
            percent.extend_from_slice(row);
            percent.push(mean);
            mean_scores.push(mean);
        }

        Ok(ScoreOutcome {
            scores,
            percent: PercentMatrix {
                data: percent,
                column_count,
            },
            mean_scores,
        })
    }
}

/// Mean and population standard deviation of a sample set
fn population_stats(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_from_rows(channel_count: usize, windows: &[Vec<f64>]) -> FeatureMatrix {
        // Same window values for every feature row of every channel
        let window_count = windows[0].len();
        let mut matrix = FeatureMatrix::zeros(channel_count, window_count);
        for feature in QualityFeature::ALL {
            for ch in 0..channel_count {
                for (w, &value) in windows[ch].iter().enumerate() {
                    matrix.set(ch, feature, w, value);
                }
            }
        }
        matrix
    }

    #[test]
    fn test_default_table_is_valid() {
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_monotonic_table_rejected() {
        let config = ScoringConfig {
            tiers: vec![
                ScoreTier { max_sigma: 2.0, score: 0.0 },
                ScoreTier { max_sigma: 1.0, score: 25.0 },
            ],
            max_score: 100.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classify_tiers() {
        let config = ScoringConfig::default();
        // mean 0, sigma 1
        assert_eq!(config.classify(0.5, 0.0, 1.0), 0.0);
        assert_eq!(config.classify(1.0, 0.0, 1.0), 0.0); // exactly 1 sigma
        assert_eq!(config.classify(1.5, 0.0, 1.0), 25.0);
        assert_eq!(config.classify(-2.0, 0.0, 1.0), 25.0); // exactly 2 sigma
        assert_eq!(config.classify(2.5, 0.0, 1.0), 50.0);
        assert_eq!(config.classify(3.5, 0.0, 1.0), 75.0);
        assert_eq!(config.classify(9.0, 0.0, 1.0), 100.0);
    }

    #[test]
    fn test_classify_degenerate_sigma() {
        let config = ScoringConfig::default();
        assert_eq!(config.classify(5.0, 5.0, 0.0), 0.0);
        assert_eq!(config.classify(5.1, 5.0, 0.0), 100.0);
        // ulp-level residue counts as equal
        assert_eq!(config.classify(5.0 + 1e-15, 5.0, 1e-16), 0.0);
    }

    #[test]
    fn test_classify_non_finite_is_undetermined() {
        let config = ScoringConfig::default();
        assert!(config.classify(f64::NAN, 0.0, 1.0).is_nan());
        assert!(config.classify(1.0, f64::NAN, 1.0).is_nan());
        assert!(config.classify(1.0, 0.0, f64::INFINITY).is_nan());
    }

    #[test]
    fn test_self_comparison_scores_zero() {
        // Identical windows: zero spread, every value equals its mean
        let features = matrix_from_rows(2, &[vec![3.7; 10], vec![-1.2; 10]]);
        let outcome = Scorer::new(ScoringConfig::default())
            .unwrap()
            .score(&features, &features)
            .unwrap();

        for feature in QualityFeature::ALL {
            for ch in 0..2 {
                assert_eq!(outcome.scores.value(feature, ch), 0.0);
            }
        }
        assert!(outcome.mean_scores.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_one_sigma_boundary_inclusive() {
        // Clean {-1, 1}: mean 0, population sigma exactly 1. Every test
        // value sits at exactly one sigma and must score 0.
        let clean = matrix_from_rows(1, &[vec![-1.0, 1.0]]);
        let outcome = Scorer::new(ScoringConfig::default())
            .unwrap()
            .score(&clean, &clean)
            .unwrap();

        for feature in QualityFeature::ALL {
            assert_eq!(outcome.scores.value(feature, 0), 0.0);
        }
    }

    #[test]
    fn test_window_average_aggregation() {
        // Clean {-1, 1}: mean 0, sigma 1. Test windows at 0.5 (tier 0)
        // and 1.5 (tier 25): average 12.5.
        let clean = matrix_from_rows(1, &[vec![-1.0, 1.0]]);
        let test = matrix_from_rows(1, &[vec![0.5, 1.5]]);
        let outcome = Scorer::new(ScoringConfig::default())
            .unwrap()
            .score(&clean, &test)
            .unwrap();

        for feature in QualityFeature::ALL {
            assert_eq!(outcome.scores.value(feature, 0), 12.5);
        }
    }

    #[test]
    fn test_percent_matrix_appends_mean_column() {
        let clean = matrix_from_rows(2, &[vec![-1.0, 1.0], vec![-1.0, 1.0]]);
        let test = matrix_from_rows(2, &[vec![5.0, 5.0], vec![0.0, 0.0]]);
        let outcome = Scorer::new(ScoringConfig::default())
            .unwrap()
            .score(&clean, &test)
            .unwrap();

        let feature = QualityFeature::RmsAmplitude;
        assert_eq!(outcome.scores.value(feature, 0), 100.0);
        assert_eq!(outcome.scores.value(feature, 1), 0.0);

        assert_eq!(outcome.percent.column_count(), 3);
        assert_eq!(outcome.percent.row(feature), &[100.0, 0.0, 50.0]);
        assert_eq!(outcome.mean_scores[feature.index()], 50.0);
    }

    #[test]
    fn test_nan_features_stay_undetermined() {
        let clean = matrix_from_rows(1, &[vec![f64::NAN, f64::NAN]]);
        let test = matrix_from_rows(1, &[vec![f64::NAN, f64::NAN]]);
        let outcome = Scorer::new(ScoringConfig::default())
            .unwrap()
            .score(&clean, &test)
            .unwrap();

        for feature in QualityFeature::ALL {
            assert!(outcome.scores.value(feature, 0).is_nan());
            assert!(outcome.mean_scores[feature.index()].is_nan());
        }
    }

    #[test]
    fn test_channel_mismatch_rejected() {
        let clean = matrix_from_rows(2, &[vec![0.0; 4], vec![0.0; 4]]);
        let test = matrix_from_rows(1, &[vec![0.0; 4]]);
        let result = Scorer::new(ScoringConfig::default()).unwrap().score(&clean, &test);
        assert!(matches!(result, Err(EqiError::ChannelMismatch { clean: 2, test: 1 })));
    }

    #[test]
    fn test_zero_window_clean_matrix_rejected() {
        let clean = FeatureMatrix::zeros(1, 0);
        let test = FeatureMatrix::zeros(1, 4);
        let result = Scorer::new(ScoringConfig::default()).unwrap().score(&clean, &test);
        assert!(matches!(result, Err(EqiError::NumericDegeneracy { .. })));
    }
}
