//! Evaluation and transition errors.

use causeway_core::CoreError;
use causeway_lang::{LangError, LexError, SyntaxError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure while turning source or declarations into a universe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Source did not lex or parse
    #[error(transparent)]
    Lang(#[from] LangError),

    /// A bare name is declared by more than one state
    #[error("identifier `{name}` is ambiguous, declared by states: {}; qualify it as `state.{name}`", .states.join(", "))]
    AmbiguousIdentifier {
        /// The bare name
        name: String,
        /// Declaring states, in declaration order
        states: Vec<String>,
    },
}

impl From<SyntaxError> for EvalError {
    fn from(err: SyntaxError) -> Self {
        Self::Lang(err.into())
    }
}

impl From<LexError> for EvalError {
    fn from(err: LexError) -> Self {
        Self::Lang(err.into())
    }
}

impl From<EvalError> for CoreError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Lang(lang) => lang.into(),
            other => CoreError::Evaluation {
                message: other.to_string(),
            },
        }
    }
}

/// Which end of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// The `from` state
    Source,
    /// The `to` state
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Why a transition was not applied
///
/// Carried inside a transition result rather than raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionError {
    /// No transition is declared under this name
    #[error("unknown transition `{name}`")]
    UnknownTransition {
        /// Requested name
        name: String,
    },

    /// An endpoint state is not declared
    #[error("{endpoint} state `{state}` of transition `{transition}` is not declared")]
    MissingState {
        /// Transition name
        transition: String,
        /// Missing state name
        state: String,
        /// Which endpoint is missing
        endpoint: Endpoint,
    },

    /// The constraint checker reported violations
    #[error("transition `{transition}` violates {count} constraint(s)")]
    ConstraintViolation {
        /// Transition name
        transition: String,
        /// Number of violations
        count: usize,
    },
}
