//! Evaluation of `WHERE` predicates.
use crate::ast::{Filter, Operator, Segment};
use crate::compare::{compare, compile_like, like_matches};
use regex::Regex;
use serde_json::Value;

impl Filter {
    /// Tests a single element against the predicate.
    pub fn evaluate(&self, value: &Value) -> bool {
        self.evaluate_with(value, None)
    }

    /// Lazily keeps the values satisfying the predicate, preserving order.
    ///
    /// A `like` against a constant pattern compiles the pattern once for the
    /// whole pass.
    pub fn filter<'v, I>(&self, values: I) -> impl Iterator<Item = &'v Value>
    where
        I: IntoIterator<Item = &'v Value>,
    {
        let pattern = self.constant_like_pattern();
        values
            .into_iter()
            .filter(move |value| self.evaluate_with(value, pattern.as_ref()))
    }

    fn evaluate_with(&self, value: &Value, pattern: Option<&Regex>) -> bool {
        match self {
            Filter::Always => true,
            Filter::KeyExists(selector) => !selector.select(value).is_empty(),
            Filter::Compare { lhs, op, rhs } => {
                let lhs = lhs.select(value).into_values();
                let rhs = rhs.select(value).into_values();
                compare_selections(lhs, *op, rhs, pattern)
            }
        }
    }

    fn constant_like_pattern(&self) -> Option<Regex> {
        let Filter::Compare {
            op: Operator::Like,
            rhs,
            ..
        } = self
        else {
            return None;
        };
        match rhs.segments() {
            [Segment::Constant(Value::String(pattern))] => compile_like(pattern),
            _ => None,
        }
    }
}

/// Compares two selections. A single value on either side is broadcast
/// against every value of the other side; two plural selections, and any
/// `in` test, compare as whole arrays.
///
/// `pattern` is the compiled form of a single string rhs under `like`.
fn compare_selections(
    lhs: Vec<Value>,
    op: Operator,
    rhs: Vec<Value>,
    pattern: Option<&Regex>,
) -> bool {
    if op == Operator::In {
        return compare(&Value::Array(lhs), &Value::Array(rhs), op);
    }
    match (lhs.as_slice(), rhs.as_slice()) {
        (values, [Value::String(text)]) if op == Operator::Like => {
            let compiled;
            let regex = match pattern {
                Some(regex) => regex,
                None => match compile_like(text) {
                    Some(regex) => {
                        compiled = regex;
                        &compiled
                    }
                    None => return false,
                },
            };
            values.iter().any(|value| like_matches(value, regex))
        }
        (values, [single]) => values.iter().any(|value| compare(value, single, op)),
        ([single], values) => values.iter().any(|value| compare(single, value, op)),
        _ => compare(&Value::Array(lhs), &Value::Array(rhs), op),
    }
}
