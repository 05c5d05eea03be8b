//! Field type normalization for raw profiler trees.
//!
//! Profiler output stores every scalar as a string. The normalizer returns a
//! new tree in which fields matched by a [`RuleSet`] hold typed JSON values,
//! applying the same rules at every depth.

use super::rules::{FieldKind, RuleSet};
use crate::utils::config::{CHILDREN_FIELD, TIMESTAMP_FORMAT};
use crate::utils::error::CollectError;
use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};

/// Normalize a trace node and all of its descendants
///
/// **Public** - main entry point for type coercion
///
/// # Arguments
/// * `node` - Raw trace node (any depth)
/// * `rules` - Field type rules applied to every field name
///
/// # Returns
/// A new node with matched fields converted; the input is left untouched
///
/// # Errors
/// * `CollectError::FieldConversion` - A value cannot be parsed as its rule's kind
/// * `CollectError::MalformedTrace` - `children` is not a list of objects
/// * `CollectError::Config` - A field name matches rules of two different kinds
pub fn normalize(node: &Map<String, Value>, rules: &RuleSet) -> Result<Map<String, Value>, CollectError> {
    let mut normalized = Map::with_capacity(node.len());

    for (key, value) in node {
        let converted = if key == CHILDREN_FIELD {
            normalize_children(value, rules)?
        } else {
            match rules.kind_for(key)? {
                Some(kind) => convert_value(key, value, kind)?,
                None => value.clone(),
            }
        };
        normalized.insert(key.clone(), converted);
    }

    Ok(normalized)
}

/// **Private** - recurse into the `children` list
fn normalize_children(value: &Value, rules: &RuleSet) -> Result<Value, CollectError> {
    let children = value.as_array().ok_or_else(|| {
        CollectError::MalformedTrace(format!("'{}' must be a list, found {}", CHILDREN_FIELD, value))
    })?;

    children
        .iter()
        .map(|child| match child {
            Value::Object(obj) => normalize(obj, rules).map(Value::Object),
            other => Err(CollectError::MalformedTrace(format!(
                "child node must be an object, found {}",
                other
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Convert a single field value to the given kind
///
/// **Public** - also used for one-off conversions outside the tree walk
pub fn convert_value(field: &str, value: &Value, kind: FieldKind) -> Result<Value, CollectError> {
    let converted = match kind {
        FieldKind::Integer => to_integer(value),
        FieldKind::Float => to_float(value),
        FieldKind::Timestamp => to_timestamp(value),
    };

    converted.ok_or_else(|| CollectError::FieldConversion {
        field: field.to_string(),
        value: value.to_string(),
        kind: kind.to_string(),
    })
}

fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<Value> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };

    // NaN and infinities have no JSON representation
    Number::from_f64(parsed).map(Value::Number)
}

/// Parse `%m/%d/%y %H:%M:%S` as UTC and return epoch seconds
fn to_timestamp(value: &Value) -> Option<Value> {
    let s = value.as_str()?;
    let parsed = NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()?;
    Some(Value::from(parsed.and_utc().timestamp()))
}
