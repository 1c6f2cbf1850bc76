//! EQI-Simulation: synthetic EEG generation
//!
//! Reproducible EEG recordings for examples, benches, and tests.

pub mod signal_patterns;
pub mod eeg_simulator;

pub use eeg_simulator::*;
pub use signal_patterns::*;
