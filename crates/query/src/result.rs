//! The flattening container produced by every pipeline stage.
use crate::ast::{Filter, Selector};
use crate::error::QueryError;
use crate::merge::merge;
use crate::parser::{parse_predicate, parse_selectors};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::Add;

/// An ordered collection of matched values.
///
/// A `ResultSet` may hold other result sets while it is being built (a slice
/// or deep scan appends the sub-results of each element). Iteration flattens
/// them lazily, so callers only ever see values. Objects, arrays and scalars
/// are leaves: an array value is yielded as one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Value(Value),
    Nested(ResultSet),
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding exactly one value.
    pub fn single(value: Value) -> Self {
        Self {
            entries: vec![Entry::Value(value)],
        }
    }

    pub fn push(&mut self, value: Value) -> &mut Self {
        self.entries.push(Entry::Value(value));
        self
    }

    /// Appends another result set as a nested entry.
    pub fn append(&mut self, other: ResultSet) -> &mut Self {
        if !other.entries.is_empty() {
            self.entries.push(Entry::Nested(other));
        }
        self
    }

    /// The number of values yielded by iteration.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                Entry::Value(_) => 1,
                Entry::Nested(nested) => nested.len(),
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.entries.iter()],
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len());
        self.drain_into(&mut values);
        values
    }

    fn drain_into(self, values: &mut Vec<Value>) {
        for entry in self.entries {
            match entry {
                Entry::Value(value) => values.push(value),
                Entry::Nested(nested) => nested.drain_into(values),
            }
        }
    }

    /// Replaces each array value with its elements, one level deep. Other
    /// values are kept in place.
    pub fn expand_arrays(self) -> ResultSet {
        let mut expanded = ResultSet::new();
        for value in self {
            match value {
                Value::Array(items) => expanded.extend(items),
                other => {
                    expanded.push(other);
                }
            }
        }
        expanded
    }

    /// The flattened values as a JSON array.
    pub fn to_value(&self) -> Value {
        Value::Array(self.iter().cloned().collect())
    }

    /// Keeps the values matching `filter`, in order.
    pub fn filter(&self, filter: &Filter) -> ResultSet {
        filter.filter(self).cloned().collect()
    }

    /// Parses `predicate` and filters with it. A predicate that fails to parse
    /// is logged and yields an empty result.
    pub fn filter_str(&self, predicate: &str) -> ResultSet {
        match parse_predicate(predicate) {
            Ok(filter) => self.filter(&filter),
            Err(e) => {
                log::error!("Error parsing filter '{}': {}", predicate, e);
                ResultSet::new()
            }
        }
    }

    /// Applies every selector to each value and merges the partial selections.
    ///
    /// With one selector its matches are appended as they are. With several,
    /// each selector's matches are projected (one match as itself, several as
    /// an array, wrapped as `{field: ...}` when the selector ends in a field)
    /// and the projections are deep-merged into one value per element.
    pub fn select(&self, selectors: &[Selector]) -> Result<ResultSet, QueryError> {
        let mut result = ResultSet::new();
        for element in self {
            if let [selector] = selectors {
                result.append(selector.select(element));
                continue;
            }

            let mut merged = None;
            for selector in selectors {
                merged = merge(merged, project(selector, selector.select(element)))?;
            }
            if let Some(value) = merged {
                result.push(value);
            }
        }
        Ok(result)
    }

    /// Parses a comma-separated selector list and selects with it. A list that
    /// fails to parse is logged and yields an empty result.
    pub fn select_str(&self, selectors: &str) -> Result<ResultSet, QueryError> {
        match parse_selectors(selectors) {
            Ok(selectors) => self.select(&selectors),
            Err(e) => {
                log::error!("Error parsing selectors '{}': {}", selectors, e);
                Ok(ResultSet::new())
            }
        }
    }
}

fn project(selector: &Selector, matches: ResultSet) -> Option<Value> {
    let mut values = matches.into_values();
    let value = match values.len() {
        0 => return None,
        1 => values.pop()?,
        _ => Value::Array(values),
    };

    Some(match selector.label() {
        Some(label) => {
            let mut fields = Map::new();
            fields.insert(label.to_string(), value);
            Value::Object(fields)
        }
        None => value,
    })
}

/// Depth-first iterator over the values of a [`ResultSet`].
pub struct Iter<'a> {
    stack: Vec<std::slice::Iter<'a, Entry>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Entry::Value(value)) => return Some(value),
                Some(Entry::Nested(nested)) => self.stack.push(nested.entries.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_values().into_iter()
    }
}

impl FromIterator<Value> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Entry::Value).collect(),
        }
    }
}

impl Extend<Value> for ResultSet {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, iter: I) {
        self.entries.extend(iter.into_iter().map(Entry::Value));
    }
}

impl Add for ResultSet {
    type Output = ResultSet;

    fn add(mut self, rhs: ResultSet) -> ResultSet {
        self.entries.extend(rhs.entries);
        self
    }
}

impl fmt::Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} results", self.len())
    }
}
