//! EQI-Core: Foundation types for EEG quality assessment
//!
//! Recording container, metadata, and the shared error taxonomy.

pub mod recording;
pub mod eeg_types;
pub mod error;

pub use recording::*;
pub use eeg_types::*;
pub use error::{EqiError, EqiResult};
