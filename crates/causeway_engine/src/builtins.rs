//! Built-in functions.
//!
//! Every built-in has a fixed argument shape. Arguments that do not fit, and
//! names outside this set, produce an unresolved call instead of an error.

use crate::value::Value;
use causeway_core::CanonicalEncode;

/// Names of the built-in functions
pub const BUILTINS: [&str; 11] = [
    "sum", "dot", "norm", "scale", "add", "mul", "min", "max", "abs", "sqrt", "hash",
];

/// Whether a function name is a built-in
#[must_use]
pub fn is_builtin(function: &str) -> bool {
    BUILTINS.contains(&function)
}

/// Apply a function to evaluated arguments
#[must_use]
pub fn call(function: &str, args: Vec<Value>) -> Value {
    let result = match function {
        "sum" => sum(&args),
        "dot" => dot(&args),
        "norm" => norm(&args),
        "scale" => scale(&args),
        "add" => zip_with(&args, |a, b| a + b),
        "mul" => zip_with(&args, |a, b| a * b),
        "min" => fold(&args, f64::min),
        "max" => fold(&args, f64::max),
        "abs" => map_numeric(&args, |x| Some(x.abs())),
        "sqrt" => map_numeric(&args, |x| (x >= 0.0).then(|| x.sqrt())),
        "hash" => Some(hash(&args)),
        _ => None,
    };
    match result {
        Some(value) => value,
        None => {
            tracing::trace!(function, args = args.len(), "call left unresolved");
            Value::unresolved_call(function, args)
        }
    }
}

/// Fingerprint of a value as hex text
#[must_use]
pub fn fingerprint(value: &Value) -> Value {
    Value::Text(value.fingerprint().to_hex())
}

/// Numbers from a single numeric vector, or from several numeric arguments
fn numeric_args(args: &[Value]) -> Option<Vec<f64>> {
    match args {
        [single] => single
            .as_numeric_vector()
            .or_else(|| single.as_number().map(|n| vec![n])),
        _ => args.iter().map(Value::as_number).collect(),
    }
}

fn sum(args: &[Value]) -> Option<Value> {
    if args.is_empty() {
        return None;
    }
    numeric_args(args).map(|v| Value::Number(v.iter().sum()))
}

fn dot(args: &[Value]) -> Option<Value> {
    let [a, b] = args else { return None };
    let (a, b) = (a.as_numeric_vector()?, b.as_numeric_vector()?);
    if a.len() != b.len() {
        return None;
    }
    Some(Value::Number(a.iter().zip(&b).map(|(x, y)| x * y).sum()))
}

fn norm(args: &[Value]) -> Option<Value> {
    let [v] = args else { return None };
    match v {
        Value::Number(n) => Some(Value::Number(n.abs())),
        other => other.magnitude().map(Value::Number),
    }
}

fn scale(args: &[Value]) -> Option<Value> {
    let [v, k] = args else { return None };
    let k = k.as_number()?;
    match v {
        Value::Number(n) => Some(Value::Number(n * k)),
        other => other
            .as_numeric_vector()
            .map(|items| Value::numbers(items.into_iter().map(|x| x * k))),
    }
}

/// Two numbers, or two equal-length numeric vectors elementwise
fn zip_with(args: &[Value], op: impl Fn(f64, f64) -> f64) -> Option<Value> {
    let [a, b] = args else { return None };
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return Some(Value::Number(op(x, y)));
    }
    let (a, b) = (a.as_numeric_vector()?, b.as_numeric_vector()?);
    if a.len() != b.len() {
        return None;
    }
    Some(Value::numbers(a.iter().zip(&b).map(|(x, y)| op(*x, *y))))
}

fn fold(args: &[Value], op: impl Fn(f64, f64) -> f64) -> Option<Value> {
    let numbers = numeric_args(args)?;
    numbers.into_iter().reduce(op).map(Value::Number)
}

/// One number, or elementwise over one numeric vector
fn map_numeric(args: &[Value], op: impl Fn(f64) -> Option<f64>) -> Option<Value> {
    let [v] = args else { return None };
    match v {
        Value::Number(n) => op(*n).map(Value::Number),
        other => other
            .as_numeric_vector()?
            .into_iter()
            .map(op)
            .collect::<Option<Vec<_>>>()
            .map(Value::numbers),
    }
}

fn hash(args: &[Value]) -> Value {
    match args {
        [single] => fingerprint(single),
        _ => fingerprint(&Value::Vector(args.to_vec())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[f64]) -> Value {
        Value::numbers(items.iter().copied())
    }

    fn n(x: f64) -> Value {
        Value::Number(x)
    }

    #[test]
    fn test_sum() {
        assert_eq!(call("sum", vec![v(&[1.0, 2.0, 3.5])]), n(6.5));
        assert_eq!(call("sum", vec![n(1.0), n(2.0)]), n(3.0));
        assert_eq!(call("sum", vec![v(&[])]), n(0.0));
        assert!(!call("sum", vec![]).is_resolved());
    }

    #[test]
    fn test_dot_requires_equal_lengths() {
        assert_eq!(call("dot", vec![v(&[1.0, 2.0]), v(&[3.0, 4.0])]), n(11.0));
        let mismatch = call("dot", vec![v(&[1.0]), v(&[3.0, 4.0])]);
        assert!(matches!(
            mismatch,
            Value::Unresolved(crate::value::Unresolved::Call { ref function, .. }) if function == "dot"
        ));
    }

    #[test]
    fn test_norm_and_scale() {
        assert_eq!(call("norm", vec![v(&[3.0, 4.0])]), n(5.0));
        assert_eq!(call("norm", vec![n(-2.0)]), n(2.0));
        assert_eq!(call("scale", vec![v(&[1.0, -2.0]), n(3.0)]), v(&[3.0, -6.0]));
        assert_eq!(call("scale", vec![n(2.0), n(3.0)]), n(6.0));
        assert!(!call("scale", vec![v(&[1.0]), v(&[1.0])]).is_resolved());
    }

    #[test]
    fn test_add_and_mul() {
        assert_eq!(call("add", vec![n(1.0), n(2.0)]), n(3.0));
        assert_eq!(call("add", vec![v(&[1.0, 2.0]), v(&[3.0, 4.0])]), v(&[4.0, 6.0]));
        assert_eq!(call("mul", vec![v(&[1.0, 2.0]), v(&[3.0, 4.0])]), v(&[3.0, 8.0]));
        assert!(!call("mul", vec![n(1.0), v(&[1.0])]).is_resolved());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(call("min", vec![v(&[4.0, -1.0, 2.0])]), n(-1.0));
        assert_eq!(call("max", vec![n(4.0), n(9.0), n(2.0)]), n(9.0));
        assert!(!call("max", vec![v(&[])]).is_resolved());
    }

    #[test]
    fn test_abs_and_sqrt() {
        assert_eq!(call("abs", vec![n(-4.0)]), n(4.0));
        assert_eq!(call("abs", vec![v(&[-1.0, 2.0])]), v(&[1.0, 2.0]));
        assert_eq!(call("sqrt", vec![n(9.0)]), n(3.0));
        assert!(!call("sqrt", vec![n(-1.0)]).is_resolved());
        assert!(!call("sqrt", vec![v(&[4.0, -4.0])]).is_resolved());
    }

    #[test]
    fn test_hash_is_fixed_length_hex() {
        let Value::Text(hex) = call("hash", vec![n(1.0)]) else {
            panic!("hash should produce text");
        };
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(call("hash", vec![n(1.0)]), fingerprint(&n(1.0)));
        assert_ne!(call("hash", vec![n(1.0)]), call("hash", vec![n(2.0)]));
    }

    #[test]
    fn test_unknown_function_is_symbolic() {
        let value = call("frobnicate", vec![n(1.0)]);
        assert_eq!(value, Value::unresolved_call("frobnicate", vec![n(1.0)]));
        assert!(!is_builtin("frobnicate"));
        assert!(is_builtin("dot"));
    }
}
