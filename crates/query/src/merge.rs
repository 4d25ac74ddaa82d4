//! Deep merge of partial selections.
use crate::error::QueryError;
use serde_json::{Map, Value};

/// Merges `incoming` into `base`.
///
/// `None` on either side yields the other side. Objects merge key by key,
/// arrays concatenate, and scalars inside objects are overwritten. Merging
/// values of different shapes, or two scalars, is an error.
pub fn merge(base: Option<Value>, incoming: Option<Value>) -> Result<Option<Value>, QueryError> {
    match (base, incoming) {
        (base, None) => Ok(base),
        (None, incoming) => Ok(incoming),
        (Some(base), Some(incoming)) => merge_values(base, incoming).map(Some),
    }
}

fn merge_values(base: Value, incoming: Value) -> Result<Value, QueryError> {
    match (base, incoming) {
        (Value::Array(mut items), Value::Array(more)) => {
            items.extend(more);
            Ok(Value::Array(items))
        }
        (Value::Object(mut fields), Value::Object(more)) => {
            merge_fields(&mut fields, more)?;
            Ok(Value::Object(fields))
        }
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => Err(
            QueryError::merge("Cannot merge objects of different types"),
        ),
        (base, incoming) => Err(QueryError::merge(format!(
            "Cannot merge simple values {} and {}",
            base, incoming
        ))),
    }
}

fn merge_fields(fields: &mut Map<String, Value>, more: Map<String, Value>) -> Result<(), QueryError> {
    for (key, value) in more {
        if !value.is_array() && !value.is_object() {
            fields.insert(key, value);
            continue;
        }
        // Merge in place so the key keeps its position.
        match fields.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::take(existing);
                *existing = merge_values(current, value)?;
            }
            None => {
                let merged = merge_values(empty_like(&value), value)?;
                fields.insert(key, merged);
            }
        }
    }
    Ok(())
}

fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}
