//! Evaluation of selector chains against a JSON value.
use crate::ast::{Segment, Selector};
use crate::result::ResultSet;
use serde_json::Value;
use std::ops::Range;

impl Selector {
    /// Returns every value the chain matches in `value`, in document order.
    pub fn select(&self, value: &Value) -> ResultSet {
        select_segments(self.segments(), value)
    }
}

fn select_segments(segments: &[Segment], value: &Value) -> ResultSet {
    let Some((head, rest)) = segments.split_first() else {
        return ResultSet::single(value.clone());
    };

    match head {
        Segment::Constant(constant) => select_segments(rest, constant),
        Segment::Field(name) => match value {
            Value::Object(fields) => fields
                .get(name)
                .map(|child| select_segments(rest, child))
                .unwrap_or_default(),
            _ => ResultSet::new(),
        },
        Segment::Index(index) => match value {
            Value::Array(items) => resolve_index(items.len(), *index)
                .map(|i| select_segments(rest, &items[i]))
                .unwrap_or_default(),
            _ => ResultSet::new(),
        },
        Segment::Slice { start, end } => match value {
            Value::Array(items) => {
                let sliced = &items[slice_range(items.len(), *start, *end)];
                if rest.is_empty() {
                    return sliced.iter().cloned().collect();
                }
                let mut result = ResultSet::new();
                for item in sliced {
                    result.append(select_segments(rest, item));
                }
                result
            }
            _ => ResultSet::new(),
        },
        Segment::Explorer => explore(segments, rest, value),
    }
}

/// Deep scan: the rest of the chain applied to `value` itself, then the whole
/// explorer chain applied to each child, depth first.
fn explore(explorer: &[Segment], rest: &[Segment], value: &Value) -> ResultSet {
    let mut result = ResultSet::new();
    if !rest.is_empty() {
        result.append(select_segments(rest, value));
    }
    match value {
        Value::Object(fields) => {
            for child in fields.values() {
                result.append(select_segments(explorer, child));
            }
        }
        Value::Array(items) => {
            for child in items {
                result.append(select_segments(explorer, child));
            }
        }
        _ => {}
    }
    result
}

fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let resolved = if index < 0 {
        i64::try_from(len).ok()? + index
    } else {
        index
    };
    usize::try_from(resolved).ok().filter(|&i| i < len)
}

/// Python slice bounds: negative values count from the end and everything is
/// clamped to `0..len`. An empty range results when `start >= end`.
fn slice_range(len: usize, start: Option<i64>, end: Option<i64>) -> Range<usize> {
    let clamp = |bound: i64| -> usize {
        let len = len as i64;
        let bound = if bound < 0 { bound + len } else { bound };
        bound.clamp(0, len) as usize
    };
    let start = start.map_or(0, clamp);
    let end = end.map_or(len, clamp);
    start..end.max(start)
}
