//! Engine configuration.

use causeway_core::CoreResult;
use causeway_lang::LexMode;
use serde::{Deserialize, Serialize};

/// How bare identifiers are resolved when several states declare the name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fail with an ambiguity error
    #[default]
    Strict,
    /// Take the first state in declaration order
    FirstMatch,
}

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Treatment of unrecognized source characters
    pub lex_mode: LexMode,
    /// Bare identifier resolution
    pub resolution: Resolution,
}

impl EngineConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lexing mode
    #[must_use]
    pub fn with_lex_mode(mut self, lex_mode: LexMode) -> Self {
        self.lex_mode = lex_mode;
        self
    }

    /// Set the identifier resolution mode
    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Load from JSON; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
