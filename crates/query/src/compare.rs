//! Comparison semantics of the `WHERE` operators over JSON values.
use crate::ast::Operator;
use regex::Regex;
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Compares two values with `op`.
///
/// Ordering operators only apply to numbers, strings, booleans and arrays of
/// those; any other pairing is incomparable and compares as `false`.
pub fn compare(lhs: &Value, rhs: &Value, op: Operator) -> bool {
    match op {
        Operator::Equals => values_equal(lhs, rhs),
        Operator::NotEquals => !values_equal(lhs, rhs),
        Operator::LessThan => ordering(lhs, rhs) == Some(Ordering::Less),
        Operator::LessThanOrEqual => {
            matches!(ordering(lhs, rhs), Some(Ordering::Less | Ordering::Equal))
        }
        Operator::GreaterThan => ordering(lhs, rhs) == Some(Ordering::Greater),
        Operator::GreaterThanOrEqual => {
            matches!(ordering(lhs, rhs), Some(Ordering::Greater | Ordering::Equal))
        }
        Operator::In => contains(lhs, rhs),
        Operator::Like => like(lhs, rhs),
    }
}

/// Deep structural equality, with numbers compared by value (`1 == 1.0`).
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => number_ordering(a, b) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        (a, b) => a == b,
    }
}

/// The ordering of two values, or `None` when they are incomparable.
pub fn ordering(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => number_ordering(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b) {
                match ordering(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    }
}

fn number_ordering(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// `lhs in rhs`: membership in an array, or a subset test when `lhs` is
/// itself an array.
fn contains(lhs: &Value, rhs: &Value) -> bool {
    let Value::Array(haystack) = rhs else {
        return false;
    };
    let is_member = |needle: &Value| haystack.iter().any(|item| values_equal(needle, item));
    match lhs {
        Value::Array(needles) => needles.iter().all(is_member),
        needle => is_member(needle),
    }
}

fn like(lhs: &Value, rhs: &Value) -> bool {
    let (Value::String(text), Value::String(pattern)) = (lhs, rhs) else {
        return false;
    };
    compile_like(pattern).is_some_and(|regex| regex.is_match(text))
}

/// Compiles a `LIKE` pattern. An invalid pattern is logged and yields `None`.
pub(crate) fn compile_like(pattern: &str) -> Option<Regex> {
    like_regex(pattern)
        .inspect_err(|e| log::warn!("Invalid LIKE pattern '{}': {}", pattern, e))
        .ok()
}

/// `like` against an already compiled pattern.
pub(crate) fn like_matches(lhs: &Value, regex: &Regex) -> bool {
    lhs.as_str().is_some_and(|text| regex.is_match(text))
}

/// Translates a SQL `LIKE` pattern into an anchored regular expression:
/// `%` matches any run of characters, `_` exactly one.
pub fn like_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut regex_pattern = String::from("(?s)^");
    let mut buffer = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '%' => regex_pattern.push_str(".*"),
            '_' => regex_pattern.push('.'),
            c => regex_pattern.push_str(&regex::escape(c.encode_utf8(&mut buffer))),
        }
    }
    regex_pattern.push('$');
    Regex::new(&regex_pattern)
}
