//! Expression evaluator.
//!
//! Evaluation reads the universe as it is now, so evaluating the same
//! expression after further declarations may give a different value.

use crate::builtins;
use crate::config::Resolution;
use crate::error::EvalError;
use crate::universe::{Properties, Universe};
use crate::value::Value;
use causeway_lang::{Expr, Identifier};

/// Evaluate an expression against the current universe
///
/// # Errors
///
/// Returns error only when a bare identifier is ambiguous under
/// [`Resolution::Strict`]; everything else degrades to a placeholder
pub fn eval_expr(expr: &Expr, universe: &Universe) -> Result<Value, EvalError> {
    Scope {
        universe,
        local: None,
    }
    .eval(expr)
}

/// Evaluate a property of a state that is still being declared
///
/// Names in `properties` shadow the rest of the universe, both bare and
/// qualified with `state`.
pub(crate) fn eval_in_state(
    expr: &Expr,
    universe: &Universe,
    state: &str,
    properties: &Properties,
) -> Result<Value, EvalError> {
    Scope {
        universe,
        local: Some((state, properties)),
    }
    .eval(expr)
}

struct Scope<'a> {
    universe: &'a Universe,
    local: Option<(&'a str, &'a Properties)>,
}

impl Scope<'_> {
    fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Identifier(ident) => self.resolve(ident),
            Expr::Vector(items) => Ok(Value::Vector(self.eval_all(items)?)),
            Expr::Call { function, args } => {
                let args = self.eval_all(args)?;
                Ok(builtins::call(function, args))
            }
            Expr::Hash(inner) => Ok(builtins::fingerprint(&self.eval(inner)?)),
            Expr::Update { target, value } => Ok(Value::PendingUpdate {
                target: target.clone(),
                value: Box::new(self.eval(value)?),
            }),
        }
    }

    fn eval_all(&self, exprs: &[Expr]) -> Result<Vec<Value>, EvalError> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn resolve(&self, ident: &Identifier) -> Result<Value, EvalError> {
        if let Some((state, properties)) = self.local {
            let own = ident.qualifier.as_deref().is_none_or(|q| q == state);
            if let Some(value) = properties.get(&ident.name).filter(|_| own) {
                return Ok(value.clone());
            }
        }
        resolve(ident, self.universe)
    }
}

/// Resolve a property reference
fn resolve(ident: &Identifier, universe: &Universe) -> Result<Value, EvalError> {
    if let Some(state) = &ident.qualifier {
        return Ok(universe
            .property(state, &ident.name)
            .cloned()
            .unwrap_or_else(|| Value::unresolved_name(ident.to_string())));
    }

    let mut matches = universe
        .states()
        .iter()
        .filter_map(|(state, props)| props.get(&ident.name).map(|v| (state, v)));

    let Some((first_state, first)) = matches.next() else {
        return Ok(Value::unresolved_name(&ident.name));
    };

    let others: Vec<&String> = matches.map(|(state, _)| state).collect();
    if others.is_empty() {
        return Ok(first.clone());
    }

    match universe.config().resolution {
        Resolution::FirstMatch => {
            tracing::warn!(
                name = %ident.name,
                chosen = %first_state,
                candidates = others.len() + 1,
                "ambiguous identifier resolved to first declaring state"
            );
            Ok(first.clone())
        }
        Resolution::Strict => Err(EvalError::AmbiguousIdentifier {
            name: ident.name.clone(),
            states: std::iter::once(first_state)
                .chain(others)
                .cloned()
                .collect(),
        }),
    }
}
