//! Error types for detector construction.
//!
//! Only construction can fail. Once a detector exists, processing a sample
//! never returns an error: silence and ambiguous input are reported through
//! the `ready` flag and the `0.0` "no pitch" frequency instead.

use thiserror::Error;

/// Result type for detector construction.
pub type PitchResult<T> = Result<T, PitchError>;

/// Errors that can occur while building a detector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PitchError {
    /// The frequency range is empty, or the lags it implies do not fit the window.
    #[error("invalid range {lowest} Hz to {highest} Hz at {sample_rate} Hz: {reason}")]
    InvalidRange {
        /// Lowest frequency of interest.
        lowest: f64,
        /// Highest frequency of interest.
        highest: f64,
        /// Sample rate in Hz.
        sample_rate: usize,
        /// What is wrong with the range.
        reason: &'static str,
    },

    /// A tuning parameter is out of its domain.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },
}

impl PitchError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = PitchError::InvalidRange {
            lowest: 400.0,
            highest: 100.0,
            sample_rate: 44100,
            reason: "highest frequency must exceed lowest frequency",
        };
        let text = err.to_string();
        assert!(text.contains("400 Hz to 100 Hz"));
        assert!(text.contains("must exceed"));

        let err = PitchError::invalid_param("lock_scans", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'lock_scans': must be at least 1"
        );
    }
}
