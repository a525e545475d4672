//! Causeway Engine
//!
//! Evaluates parsed programs into a [`Universe`], applies named transitions,
//! and commits the resulting history to a merkle root.
//!
//! A `Universe` is exclusively owned: every mutation takes `&mut self`, and
//! there is no shared default instance. Callers that need concurrency keep
//! one universe per worker.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtins;
pub mod config;
pub mod constraint;
pub mod error;
pub mod eval;
pub mod history;
pub mod universe;
pub mod value;

pub use config::{EngineConfig, Resolution};
pub use constraint::{ConstraintChecker, ExistenceCheck, Violation};
pub use error::{Endpoint, EvalError, TransitionError};
pub use eval::eval_expr;
pub use history::{History, HistoryEntry, StateSnapshot};
pub use universe::{Binding, Properties, TransitionRecord, TransitionResult, Universe};
pub use value::{Unresolved, Value};

/// Tokenize, parse and evaluate source text with the default configuration
///
/// # Errors
///
/// Returns error if the source does not parse or a declaration fails to evaluate
pub fn evaluate(source: &str) -> Result<Universe, EvalError> {
    evaluate_with(source, EngineConfig::default())
}

/// Tokenize, parse and evaluate source text
///
/// # Errors
///
/// Returns error if the source does not parse or a declaration fails to evaluate
pub fn evaluate_with(source: &str, config: EngineConfig) -> Result<Universe, EvalError> {
    let program = causeway_lang::parse_source(source, config.lex_mode)?;
    let mut universe = Universe::with_config(config);
    universe.eval(&program)?;
    Ok(universe)
}
