//! EQI-Processing: the EEG Quality Index engine
//!
//! Sliding-window segmentation, spectral estimation, feature extraction,
//! and deviation scoring of a test recording against a clean baseline.

pub mod config;
pub mod features;
pub mod index;
pub mod scoring;
pub mod spectral;
pub mod window;

pub use config::{EqiConfig, FrequencyBand, SegmentSpec};
pub use features::{
    FeatureExtractor, FeatureMatrix, QualityFeature, FEATURE_COUNT,
};
pub use index::{EqiReport, QualityIndex};
pub use scoring::{
    PercentMatrix, ScoreMatrix, ScoreOutcome, ScoreTier, Scorer, ScoringConfig,
};
pub use spectral::{AmplitudeSpectrum, SpectralEstimator};
pub use window::{sliding_window, WindowedSignal};
