//! Constraint checking at transition time.
//!
//! The engine does not solve constraints. It asks a [`ConstraintChecker`]
//! whether a transition may be applied, and records nothing if the checker
//! reports violations.

use crate::universe::{TransitionRecord, Universe};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reason a transition may not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Declared constraint responsible, if any
    pub constraint: Option<String>,
    /// Human-readable description
    pub message: String,
}

impl Violation {
    /// Violation not tied to a declared constraint
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            constraint: None,
            message: message.into(),
        }
    }

    /// Violation of a named constraint
    #[must_use]
    pub fn of(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            constraint: Some(constraint.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(name) => write!(f, "{name}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Decides whether a transition may be applied
///
/// Implementations see the universe before the transition is recorded and
/// can read declared constraints through [`Universe::constraints`].
pub trait ConstraintChecker {
    /// Return every violation; an empty list admits the transition
    fn check(
        &self,
        universe: &Universe,
        name: &str,
        transition: &TransitionRecord,
    ) -> Vec<Violation>;
}

impl<F> ConstraintChecker for F
where
    F: Fn(&Universe, &str, &TransitionRecord) -> Vec<Violation>,
{
    fn check(
        &self,
        universe: &Universe,
        name: &str,
        transition: &TransitionRecord,
    ) -> Vec<Violation> {
        self(universe, name, transition)
    }
}

/// Default checker: the target state must exist
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistenceCheck;

impl ConstraintChecker for ExistenceCheck {
    fn check(
        &self,
        universe: &Universe,
        _name: &str,
        transition: &TransitionRecord,
    ) -> Vec<Violation> {
        if universe.state(&transition.to).is_some() {
            Vec::new()
        } else {
            vec![Violation::new(format!(
                "target state `{}` does not exist",
                transition.to
            ))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluate;

    fn record(from: &str, to: &str) -> TransitionRecord {
        TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_existence_check() {
        let universe = evaluate("state A { x = 1 }").unwrap();
        assert!(ExistenceCheck.check(&universe, "go", &record("A", "A")).is_empty());

        let violations = ExistenceCheck.check(&universe, "go", &record("A", "B"));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].constraint.is_none());
        assert!(violations[0].message.contains("`B`"));
    }

    #[test]
    fn test_closure_checker_reads_constraints() {
        let universe = evaluate("state A { x = 1 }\nconstraint bounded : x").unwrap();
        let checker = |u: &Universe, _: &str, _: &TransitionRecord| -> Vec<Violation> {
            u.constraints()
                .keys()
                .map(|name| Violation::of(name.clone(), "not satisfied"))
                .collect()
        };
        let violations = checker.check(&universe, "stay", &record("A", "A"));
        assert_eq!(violations, vec![Violation::of("bounded", "not satisfied")]);
        assert_eq!(violations[0].to_string(), "bounded: not satisfied");
    }
}
