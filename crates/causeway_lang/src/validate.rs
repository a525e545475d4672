//! Pre-flight source validation: parse without evaluating.

use crate::error::LangError;
use crate::lexer::LexMode;
use serde::{Deserialize, Serialize};

/// Result of validating source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceValidation {
    /// Whether the source parses
    pub valid: bool,
    /// Position-annotated error, if any
    pub error: Option<String>,
}

impl SourceValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn failed(err: &LangError) -> Self {
        Self {
            valid: false,
            error: Some(err.to_string()),
        }
    }
}

/// Validate source text with lenient lexing
#[must_use]
pub fn validate_source(source: &str) -> SourceValidation {
    validate_source_with(source, LexMode::Lenient)
}

/// Validate source text with the given lexing mode
#[must_use]
pub fn validate_source_with(source: &str, mode: LexMode) -> SourceValidation {
    match crate::parse_source(source, mode) {
        Ok(_) => SourceValidation::ok(),
        Err(err) => {
            tracing::debug!(error = %err, "source failed validation");
            SourceValidation::failed(&err)
        }
    }
}
