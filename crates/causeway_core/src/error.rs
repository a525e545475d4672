//! Core error types for Causeway.

use thiserror::Error;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Invalid encoding
    #[error("Invalid encoding")]
    InvalidEncoding,

    /// A recomputed fingerprint does not match the recorded one
    #[error("Fingerprint mismatch at history position {position}: expected {expected}, got {actual}")]
    FingerprintMismatch {
        /// Zero-based history position
        position: usize,
        /// Recorded fingerprint
        expected: String,
        /// Recomputed fingerprint
        actual: String,
    },

    /// Source text could not be tokenized or parsed
    #[error("Parse error: {message}")]
    Parse {
        /// Position-annotated message
        message: String,
    },

    /// Expression evaluation failed
    #[error("Evaluation error: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Validation error
    #[error("Validation failed for {field}: {reason}")]
    Validation {
        /// Field that failed
        field: String,
        /// Why it failed
        reason: String,
    },
}

impl From<serde_json::Error> for CoreError {
    fn from(_err: serde_json::Error) -> Self {
        Self::InvalidEncoding
    }
}
