//! Error handling for the EQI framework
//!
//! Single error taxonomy shared by every crate in the workspace. All
//! errors are raised synchronously at the call that detects them;
//! nothing is retried.

use core::fmt;

/// Result type alias for EQI framework operations
pub type EqiResult<T> = Result<T, EqiError>;

/// Error type for all EQI framework operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EqiError {
    /// Window/stride/size relationship that yields no valid windows
    InvalidWindow {
        /// Requested window length in samples
        window: usize,
        /// Requested stride in samples
        stride: usize,
        /// Samples available per channel
        samples: usize,
    },

    /// Clean and test recordings disagree on channel count after pairing
    ChannelMismatch {
        /// Channel count of the clean recording
        clean: usize,
        /// Channel count of the test recording
        test: usize,
    },

    /// A requested frequency band contains no spectral bin
    BandEmpty {
        /// Lower band edge in Hz
        low_hz: f64,
        /// Upper band edge in Hz
        high_hz: f64,
        /// Spectral resolution in Hz
        resolution_hz: f64,
    },

    /// A statistical distribution could not be formed
    NumericDegeneracy {
        /// Description of the degenerate quantity
        reason: String,
    },

    /// Signal data inconsistent with its metadata
    InvalidSignalData {
        /// Description of the data error
        reason: String,
    },

    /// Sampling rate outside the supported range
    InvalidSamplingRate {
        /// Provided sampling rate in Hz
        rate: f64,
        /// Valid range description
        valid_range: String,
    },

    /// Channel count outside the supported range
    InvalidChannelCount {
        /// Requested channel count
        count: usize,
        /// Maximum supported channels
        max: usize,
    },

    /// Invalid configuration value
    ConfigurationError {
        /// Description of the configuration error
        message: String,
    },
}

impl fmt::Display for EqiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqiError::InvalidWindow { window, stride, samples } => {
                write!(f, "Invalid windowing: window {} / stride {} over {} samples yields no windows",
                       window, stride, samples)
            }
            EqiError::ChannelMismatch { clean, test } => {
                write!(f, "Channel mismatch: clean recording has {} channels, test has {}",
                       clean, test)
            }
            EqiError::BandEmpty { low_hz, high_hz, resolution_hz } => {
                write!(f, "Empty frequency band [{}, {}] Hz at {} Hz resolution",
                       low_hz, high_hz, resolution_hz)
            }
            EqiError::NumericDegeneracy { reason } => {
                write!(f, "Numeric degeneracy: {}", reason)
            }
            EqiError::InvalidSignalData { reason } => {
                write!(f, "Invalid signal data: {}", reason)
            }
            EqiError::InvalidSamplingRate { rate, valid_range } => {
                write!(f, "Invalid sampling rate: {}Hz, valid range: {}", rate, valid_range)
            }
            EqiError::InvalidChannelCount { count, max } => {
                write!(f, "Invalid channel count: requested {}, max supported {}", count, max)
            }
            EqiError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
        }
    }
}

impl std::error::Error for EqiError {}
