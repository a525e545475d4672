//! The universe: declared states, transitions, bindings and history.

use crate::config::EngineConfig;
use crate::constraint::{ConstraintChecker, ExistenceCheck, Violation};
use crate::error::{Endpoint, EvalError, TransitionError};
use crate::eval::{eval_expr, eval_in_state};
use crate::history::{History, StateSnapshot};
use crate::value::Value;
use causeway_core::{CoreResult, Hash};
use causeway_lang::{ArbitrationDecl, Declaration, Expr, NamedExpr, Program, StateDecl};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Property values of one state, in declaration order
pub type Properties = IndexMap<String, Value>;

/// Endpoints of a declared transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Source state name
    pub from: String,
    /// Target state name
    pub to: String,
}

/// A declared expression together with its value at declaration time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Source expression
    pub expr: Expr,
    /// Evaluated value
    pub value: Value,
}

/// Outcome of applying a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    /// Whether an entry was appended to the history
    pub valid: bool,
    /// Requested transition name
    pub transition: String,
    /// Fingerprint of the appended entry; null when rejected
    #[serde(default)]
    pub fingerprint: Option<Hash>,
    /// Source state, when the transition is declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Target state, when the transition is declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Why the transition was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TransitionError>,
    /// Checker violations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl TransitionResult {
    fn applied(name: &str, record: &TransitionRecord, fingerprint: Hash) -> Self {
        Self {
            valid: true,
            transition: name.to_string(),
            fingerprint: Some(fingerprint),
            from: Some(record.from.clone()),
            to: Some(record.to.clone()),
            error: None,
            violations: Vec::new(),
        }
    }

    fn rejected(name: &str, record: Option<&TransitionRecord>, error: TransitionError) -> Self {
        Self {
            valid: false,
            transition: name.to_string(),
            fingerprint: None,
            from: record.map(|r| r.from.clone()),
            to: record.map(|r| r.to.clone()),
            error: Some(error),
            violations: Vec::new(),
        }
    }

    /// Check if the transition was applied
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Everything a program declares, plus the history of applied transitions
#[derive(Debug, Clone, Default)]
pub struct Universe {
    config: EngineConfig,
    states: IndexMap<String, Properties>,
    transitions: IndexMap<String, TransitionRecord>,
    constraints: IndexMap<String, Expr>,
    fields: IndexMap<String, Binding>,
    operators: IndexMap<String, Binding>,
    proofs: IndexMap<String, Binding>,
    meta: IndexMap<String, Binding>,
    arbitration: Vec<Properties>,
    history: History,
}

impl Universe {
    /// Create an empty universe with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty universe
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Fold a program's declarations into the universe, in document order
    ///
    /// Redeclaring a name replaces the earlier declaration.
    ///
    /// # Errors
    ///
    /// Returns the first evaluation error. Declarations before the failing
    /// one stay applied; the failing one leaves no trace.
    pub fn eval(&mut self, program: &Program) -> Result<(), EvalError> {
        for declaration in &program.declarations {
            self.declare(declaration)?;
        }
        debug!(
            declarations = program.len(),
            states = self.states.len(),
            transitions = self.transitions.len(),
            "program evaluated"
        );
        Ok(())
    }

    fn declare(&mut self, declaration: &Declaration) -> Result<(), EvalError> {
        match declaration {
            Declaration::State(decl) => self.declare_state(decl),
            Declaration::Transition(decl) => {
                let record = TransitionRecord {
                    from: decl.from.clone(),
                    to: decl.to.clone(),
                };
                let replaced = self.transitions.insert(decl.name.clone(), record).is_some();
                debug!(
                    name = %decl.name,
                    from = %decl.from,
                    to = %decl.to,
                    replaced,
                    "transition declared"
                );
                Ok(())
            }
            Declaration::Constraint(decl) => {
                let replaced = self
                    .constraints
                    .insert(decl.name.clone(), decl.expr.clone())
                    .is_some();
                debug!(name = %decl.name, replaced, "constraint declared");
                Ok(())
            }
            Declaration::Field(decl) => {
                let binding = self.bind(decl)?;
                record_binding(&mut self.fields, "field", decl, binding);
                Ok(())
            }
            Declaration::Operator(decl) => {
                let binding = self.bind(decl)?;
                record_binding(&mut self.operators, "operator", decl, binding);
                Ok(())
            }
            Declaration::Proof(decl) => {
                let binding = self.bind(decl)?;
                record_binding(&mut self.proofs, "proof", decl, binding);
                Ok(())
            }
            Declaration::Meta(decl) => {
                let binding = self.bind(decl)?;
                record_binding(&mut self.meta, "meta", decl, binding);
                Ok(())
            }
            Declaration::Arbitration(decl) => self.declare_arbitration(decl),
        }
    }

    /// Properties are evaluated in order, so a later one sees earlier ones.
    /// The universe is only touched once every property has a value.
    fn declare_state(&mut self, decl: &StateDecl) -> Result<(), EvalError> {
        let mut properties = Properties::new();
        for property in &decl.properties {
            let value = eval_in_state(&property.value, self, &decl.name, &properties)?;
            properties.insert(property.name.clone(), value);
        }

        let replaced = self.states.insert(decl.name.clone(), properties).is_some();
        debug!(
            name = %decl.name,
            properties = decl.properties.len(),
            replaced,
            "state declared"
        );
        Ok(())
    }

    fn declare_arbitration(&mut self, decl: &ArbitrationDecl) -> Result<(), EvalError> {
        let mut rules = Properties::new();
        for rule in &decl.rules {
            rules.insert(rule.name.clone(), eval_expr(&rule.value, self)?);
        }
        debug!(rules = rules.len(), line = decl.line, "arbitration rules declared");
        self.arbitration.push(rules);
        Ok(())
    }

    fn bind(&self, decl: &NamedExpr) -> Result<Binding, EvalError> {
        Ok(Binding {
            expr: decl.expr.clone(),
            value: eval_expr(&decl.expr, self)?,
        })
    }

    /// Apply a named transition with the default [`ExistenceCheck`]
    pub fn apply_transition(&mut self, name: &str) -> TransitionResult {
        self.apply_transition_with(name, &ExistenceCheck)
    }

    /// Apply a named transition, consulting `checker` before recording it
    ///
    /// A rejected transition leaves the universe untouched.
    pub fn apply_transition_with(
        &mut self,
        name: &str,
        checker: &dyn ConstraintChecker,
    ) -> TransitionResult {
        let Some(record) = self.transitions.get(name).cloned() else {
            debug!(transition = name, "unknown transition");
            return TransitionResult::rejected(
                name,
                None,
                TransitionError::UnknownTransition {
                    name: name.to_string(),
                },
            );
        };

        let missing = |state: &str, endpoint| TransitionError::MissingState {
            transition: name.to_string(),
            state: state.to_string(),
            endpoint,
        };
        let Some(from) = self.states.get(&record.from) else {
            debug!(transition = name, state = %record.from, "source state missing");
            return TransitionResult::rejected(
                name,
                Some(&record),
                missing(&record.from, Endpoint::Source),
            );
        };
        let Some(to) = self.states.get(&record.to) else {
            debug!(transition = name, state = %record.to, "target state missing");
            return TransitionResult::rejected(
                name,
                Some(&record),
                missing(&record.to, Endpoint::Target),
            );
        };
        let from_snapshot = StateSnapshot::capture(&record.from, from);
        let to_snapshot = StateSnapshot::capture(&record.to, to);

        let violations = checker.check(self, name, &record);
        if !violations.is_empty() {
            debug!(transition = name, violations = violations.len(), "transition rejected");
            let mut result = TransitionResult::rejected(
                name,
                Some(&record),
                TransitionError::ConstraintViolation {
                    transition: name.to_string(),
                    count: violations.len(),
                },
            );
            result.violations = violations;
            return result;
        }

        let entry = self.history.append(name, from_snapshot, to_snapshot);
        debug!(
            transition = name,
            from = %entry.from,
            to = %entry.to,
            sequence = %entry.sequence,
            fingerprint = %entry.fingerprint,
            "transition applied"
        );
        TransitionResult::applied(name, &record, entry.fingerprint)
    }

    /// Merkle root of the history; all zeros when nothing has been applied
    #[must_use]
    pub fn merkle_root(&self) -> Hash {
        self.history.merkle_root()
    }

    /// Recompute every history fingerprint from its recorded snapshots
    ///
    /// # Errors
    ///
    /// Returns error at the first entry that does not reproduce
    pub fn verify_history(&self) -> CoreResult<()> {
        self.history.verify()
    }

    /// Value of a property of a named state
    #[must_use]
    pub fn property(&self, state: &str, name: &str) -> Option<&Value> {
        self.states.get(state)?.get(name)
    }

    /// Properties of a named state
    #[must_use]
    pub fn state(&self, name: &str) -> Option<&Properties> {
        self.states.get(name)
    }

    /// All states in declaration order
    #[must_use]
    pub fn states(&self) -> &IndexMap<String, Properties> {
        &self.states
    }

    /// Declared transition by name
    #[must_use]
    pub fn transition(&self, name: &str) -> Option<&TransitionRecord> {
        self.transitions.get(name)
    }

    /// All transitions in declaration order
    #[must_use]
    pub fn transitions(&self) -> &IndexMap<String, TransitionRecord> {
        &self.transitions
    }

    /// Constraint expressions, unevaluated
    #[must_use]
    pub fn constraints(&self) -> &IndexMap<String, Expr> {
        &self.constraints
    }

    /// Field bindings
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, Binding> {
        &self.fields
    }

    /// Operator (`micronaut`) bindings
    #[must_use]
    pub fn operators(&self) -> &IndexMap<String, Binding> {
        &self.operators
    }

    /// Proof bindings
    #[must_use]
    pub fn proofs(&self) -> &IndexMap<String, Binding> {
        &self.proofs
    }

    /// Meta rule bindings
    #[must_use]
    pub fn meta(&self) -> &IndexMap<String, Binding> {
        &self.meta
    }

    /// Arbitration rule sets, one per block
    #[must_use]
    pub fn arbitration(&self) -> &[Properties] {
        &self.arbitration
    }

    /// Applied transitions
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Engine configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn record_binding(
    map: &mut IndexMap<String, Binding>,
    kind: &'static str,
    decl: &NamedExpr,
    binding: Binding,
) {
    let replaced = map.insert(decl.name.clone(), binding).is_some();
    debug!(kind, name = %decl.name, replaced, "binding declared");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{evaluate, evaluate_with, Resolution};
    use causeway_lang::LexMode;
    use proptest::prelude::*;

    const SCENARIO: &str = "state A { x = 1 }\nstate B { x = 2 }\ntransition go : A -> B";

    #[test]
    fn test_scenario_apply_go() {
        let mut u = evaluate(SCENARIO).unwrap();
        let result = u.apply_transition("go");
        assert!(result.is_valid());
        assert_eq!(result.from.as_deref(), Some("A"));
        assert_eq!(result.to.as_deref(), Some("B"));
        assert_eq!(u.history().len(), 1);

        let fingerprint = result.fingerprint.unwrap().to_hex();
        assert_eq!(fingerprint.len(), 64);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));

        let entry = u.history().last().unwrap();
        assert_eq!(entry.from, "A");
        assert_eq!(entry.to, "B");
        assert_eq!(entry.fingerprint, result.fingerprint.unwrap());
    }

    #[test]
    fn test_unknown_transition_leaves_history() {
        let mut u = evaluate(SCENARIO).unwrap();
        let result = u.apply_transition("gone");
        assert!(!result.is_valid());
        assert_eq!(
            result.error,
            Some(TransitionError::UnknownTransition {
                name: "gone".to_string()
            })
        );
        assert!(result.fingerprint.is_none());
        assert!(u.history().is_empty());
        assert_eq!(u.merkle_root(), Hash::zero());
    }

    #[test]
    fn test_missing_source_checked_first() {
        let mut u = evaluate("transition jump : X -> Y").unwrap();
        let result = u.apply_transition("jump");
        assert_eq!(
            result.error,
            Some(TransitionError::MissingState {
                transition: "jump".to_string(),
                state: "X".to_string(),
                endpoint: Endpoint::Source,
            })
        );
        assert_eq!(result.from.as_deref(), Some("X"));
        assert!(u.history().is_empty());
    }

    #[test]
    fn test_missing_target() {
        let mut u = evaluate("state A { x = 1 }\ntransition jump : A -> Nowhere").unwrap();
        let result = u.apply_transition("jump");
        assert!(matches!(
            result.error,
            Some(TransitionError::MissingState {
                endpoint: Endpoint::Target,
                ..
            })
        ));
        assert!(u.history().is_empty());
    }

    #[test]
    fn test_checker_violations_do_not_mutate() {
        let mut u = evaluate(&format!("{SCENARIO}\nconstraint cap : x")).unwrap();
        let deny = |u: &Universe, _: &str, _: &TransitionRecord| -> Vec<Violation> {
            u.constraints()
                .keys()
                .map(|name| Violation::of(name.clone(), "denied"))
                .collect()
        };
        let result = u.apply_transition_with("go", &deny);
        assert!(!result.is_valid());
        assert_eq!(
            result.error,
            Some(TransitionError::ConstraintViolation {
                transition: "go".to_string(),
                count: 1,
            })
        );
        assert_eq!(result.violations[0].constraint.as_deref(), Some("cap"));
        assert!(u.history().is_empty());

        let allow = |_: &Universe, _: &str, _: &TransitionRecord| -> Vec<Violation> { Vec::new() };
        assert!(u.apply_transition_with("go", &allow).is_valid());
        assert_eq!(u.history().len(), 1);
    }

    #[test]
    fn test_merkle_root_order_sensitive() {
        let source = "state A { x = 1 }\nstate B { x = 2 }\n\
                      transition go : A -> B\ntransition back : B -> A";
        let run = |names: &[&str]| {
            let mut u = evaluate(source).unwrap();
            for name in names {
                assert!(u.apply_transition(name).is_valid());
            }
            u.merkle_root()
        };
        assert_eq!(run(&["go", "back", "go"]), run(&["go", "back", "go"]));
        assert_ne!(run(&["go", "back"]), run(&["back", "go"]));
        assert_ne!(run(&["go"]), Hash::zero());
    }

    #[test]
    fn test_snapshots_are_by_value() {
        let mut u = evaluate(SCENARIO).unwrap();
        u.apply_transition("go");
        let before = u.history().get(0).unwrap().clone();

        let program = causeway_lang::parse_source("state A { x = 100 }", LexMode::Lenient).unwrap();
        u.eval(&program).unwrap();
        u.apply_transition("go");

        let first = u.history().get(0).unwrap();
        assert_eq!(first, &before);
        assert_eq!(first.from_snapshot.properties["x"], Value::Number(1.0));
        assert_ne!(first.fingerprint, u.history().get(1).unwrap().fingerprint);
        assert!(u.verify_history().is_ok());
    }

    #[test]
    fn test_replay_reproduces_fingerprints() {
        let mut first = evaluate(SCENARIO).unwrap();
        let mut second = evaluate(SCENARIO).unwrap();
        let a = first.apply_transition("go");
        let b = second.apply_transition("go");
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(first.merkle_root(), second.merkle_root());
        assert!(first.verify_history().is_ok());
    }

    #[test]
    fn test_declarations_are_stored() {
        let source = "state A { v = [3, 4] n = norm(v) }\n\
                      field f : [1, 0]\n\
                      micronaut m : scale(A.v, 2)\n\
                      proof p : hash(n)\n\
                      meta rule : 7\n\
                      constraint c : n\n\
                      arbitration { priority = 1, weight = max(2, 3) }";
        let u = evaluate(source).unwrap();
        assert_eq!(u.property("A", "n"), Some(&Value::Number(5.0)));
        assert_eq!(u.fields()["f"].value, Value::numbers([1.0, 0.0]));
        assert_eq!(u.operators()["m"].value, Value::numbers([6.0, 8.0]));
        assert!(matches!(u.proofs()["p"].value, Value::Text(ref hex) if hex.len() == 64));
        assert_eq!(u.meta()["rule"].value, Value::Number(7.0));
        assert_eq!(u.constraints()["c"], Expr::ident("n"));
        assert_eq!(u.arbitration().len(), 1);
        assert_eq!(u.arbitration()[0]["weight"], Value::Number(3.0));
    }

    #[test]
    fn test_redeclaration_last_write_wins() {
        let source = "state A { x = 1 }\nstate B { y = 0 }\nstate A { x = 5 }\n\
                      transition t : A -> B\ntransition t : B -> A";
        let u = evaluate(source).unwrap();
        assert_eq!(u.states().len(), 2);
        assert_eq!(u.states().get_index(0).map(|(k, _)| k.as_str()), Some("A"));
        assert_eq!(u.property("A", "x"), Some(&Value::Number(5.0)));
        assert_eq!(u.transition("t").unwrap().from, "B");
    }

    #[test]
    fn test_failed_state_declaration_leaves_no_trace() {
        let mut u = evaluate("state A { x = 1 }\nstate B { x = 2 }\nstate C { x = 3 }").unwrap();
        let program =
            causeway_lang::parse_source("state D { y = x }", LexMode::Lenient).unwrap();
        assert!(matches!(
            u.eval(&program),
            Err(EvalError::AmbiguousIdentifier { .. })
        ));
        assert!(u.state("D").is_none());

        let program =
            causeway_lang::parse_source("state A { z = x }", LexMode::Lenient).unwrap();
        assert!(u.eval(&program).is_err());
        assert_eq!(u.property("A", "x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_redeclaration_sees_previous_contents() {
        let u = evaluate("state A { x = 1 }\nstate A { x = add(x, 1) y = A.x }").unwrap();
        assert_eq!(u.property("A", "x"), Some(&Value::Number(2.0)));
        assert_eq!(u.property("A", "y"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_own_properties_shadow_other_states() {
        let u = evaluate("state A { x = 1 }\nstate B { x = 2 y = x }").unwrap();
        assert_eq!(u.property("B", "y"), Some(&Value::Number(2.0)));
        assert_eq!(u.property("A", "x"), Some(&Value::Number(1.0)));

        let u = evaluate("state A { x = 1 }\nstate B { x = 2 z = A.x }").unwrap();
        assert_eq!(u.property("B", "z"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_first_match_resolution() {
        let config = EngineConfig::new().with_resolution(Resolution::FirstMatch);
        let u = evaluate_with("state A { x = 1 }\nstate B { x = 2 }\nstate C { y = x }", config)
            .unwrap();
        assert_eq!(u.property("C", "y"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_result_json() {
        let mut u = evaluate(SCENARIO).unwrap();
        let json = serde_json::to_value(u.apply_transition("gone")).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"]["kind"], "unknown_transition");
        assert!(json["fingerprint"].is_null());
        assert!(json.as_object().unwrap().contains_key("fingerprint"));

        let json = serde_json::to_value(u.apply_transition("go")).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["fingerprint"].as_str().map(str::len), Some(64));
    }

    proptest! {
        #[test]
        fn prop_history_grows_only_on_valid(names in prop::collection::vec(
            prop::sample::select(vec!["go", "back", "gone", "loop"]), 0..12
        )) {
            let source = "state A { x = 1 }\nstate B { x = 2 }\n\
                          transition go : A -> B\ntransition back : B -> A\n\
                          transition loop : A -> Z";
            let mut u = evaluate(source).unwrap();
            let mut valid = 0;
            for name in &names {
                if u.apply_transition(name).is_valid() {
                    valid += 1;
                }
            }
            prop_assert_eq!(u.history().len(), valid);
            prop_assert!(u.verify_history().is_ok());
        }
    }
}
