//! Runtime values produced by expression evaluation.

use causeway_core::CanonicalEncode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An evaluated expression
///
/// Evaluation never guesses silently: names that resolve to nothing and
/// calls that cannot be computed come back as [`Value::Unresolved`], so
/// callers can tell computed values from symbolic placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Number
    Number(f64),
    /// Ordered sequence
    Vector(Vec<Value>),
    /// Text, e.g. a fingerprint
    Text(String),
    /// `update(target, value)`; returned, never applied
    PendingUpdate {
        /// Name the update targets
        target: String,
        /// Evaluated new value
        value: Box<Value>,
    },
    /// A symbolic placeholder
    Unresolved(Unresolved),
}

/// What could not be resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unresolved {
    /// A name no state declares
    Identifier(String),
    /// An unknown function, or a built-in given arguments it cannot use
    Call {
        /// Function name
        function: String,
        /// Evaluated arguments
        args: Vec<Value>,
    },
}

impl Value {
    /// Symbolic placeholder for a name
    #[must_use]
    pub fn unresolved_name(name: impl Into<String>) -> Self {
        Self::Unresolved(Unresolved::Identifier(name.into()))
    }

    /// Symbolic placeholder for a call
    #[must_use]
    pub fn unresolved_call(function: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Unresolved(Unresolved::Call {
            function: function.into(),
            args,
        })
    }

    /// Vector of numbers
    #[must_use]
    pub fn numbers(items: impl IntoIterator<Item = f64>) -> Self {
        Self::Vector(items.into_iter().map(Self::Number).collect())
    }

    /// Numeric value, if this is a number
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Elements, if this is a vector whose elements are all numbers
    #[must_use]
    pub fn as_numeric_vector(&self) -> Option<Vec<f64>> {
        match self {
            Self::Vector(items) => items.iter().map(Self::as_number).collect(),
            _ => None,
        }
    }

    /// Euclidean magnitude of a numeric vector
    #[must_use]
    pub fn magnitude(&self) -> Option<f64> {
        self.as_numeric_vector()
            .map(|v| v.iter().map(|x| x * x).sum::<f64>().sqrt())
    }

    /// True when no unresolved placeholder appears anywhere inside
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Number(_) | Self::Text(_) => true,
            Self::Vector(items) => items.iter().all(Self::is_resolved),
            Self::PendingUpdate { value, .. } => value.is_resolved(),
            Self::Unresolved(_) => false,
        }
    }
}

impl CanonicalEncode for Value {}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Text(text) => write!(f, "{text:?}"),
            Self::PendingUpdate { target, value } => write!(f, "update({target}, {value})"),
            Self::Unresolved(Unresolved::Identifier(name)) => write!(f, "?{name}"),
            Self::Unresolved(Unresolved::Call { function, args }) => {
                write!(f, "?{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}
