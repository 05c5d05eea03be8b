//! Depth-first flattening of a normalized trace tree.
//!
//! Every node becomes one [`FlatRecord`]; a parent is always emitted before
//! its children, so a flat list can be scanned forward to rebuild the tree.
//!
//! Example: `whole-program -> [assembly, solve]` flattens to
//! `/whole-program`, `/whole-program/assembly`, `/whole-program/solve`.

use super::identity::{child_path, Indices};
use crate::parser::profiler_trace::SplitTrace;
use crate::parser::schema::FlatRecord;
use crate::utils::config::{CHILDREN_FIELD, TAG_FIELD};
use crate::utils::error::CollectError;
use log::debug;
use serde_json::{Map, Value};

/// Keys owned by the record envelope; node fields with these names are replaced
const RESERVED_FIELDS: &[&str] = &["base", "indices"];

/// Flatten a root node into pre-order records
///
/// **Public** - main entry point for flattening
///
/// # Arguments
/// * `root` - Normalized root timer node
/// * `base` - Run-level context copied onto every record
///
/// # Errors
/// * `CollectError::MalformedTrace` - A node lacks a string `tag`, or `children` is not a list of objects
pub fn flatten(
    root: &Map<String, Value>,
    base: &Map<String, Value>,
) -> Result<Vec<FlatRecord>, CollectError> {
    let mut records = Vec::new();
    unwind(root, base, "", &mut records)?;

    debug!("Flattened trace into {} records", records.len());
    Ok(records)
}

/// Flatten a split trace; a trace without a root yields no records
pub fn flatten_trace(split: &SplitTrace) -> Result<Vec<FlatRecord>, CollectError> {
    match &split.root {
        Some(root) => flatten(root, &split.base),
        None => Ok(Vec::new()),
    }
}

/// **Private** - recursive pre-order walk carrying the parent path
fn unwind(
    node: &Map<String, Value>,
    base: &Map<String, Value>,
    parent: &str,
    out: &mut Vec<FlatRecord>,
) -> Result<(), CollectError> {
    let tag = node
        .get(TAG_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            CollectError::MalformedTrace(format!(
                "node under '{}' has no string '{}' field",
                parent, TAG_FIELD
            ))
        })?;

    let indices = Indices::new(tag, parent);
    let path = indices.path.clone();

    let fields: Map<String, Value> = node
        .iter()
        .filter(|(k, _)| k.as_str() != CHILDREN_FIELD && !RESERVED_FIELDS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    out.push(FlatRecord {
        fields,
        base: base.clone(),
        indices,
    });

    for child in children_of(node, &path)? {
        unwind(child, base, &path, out)?;
    }

    Ok(())
}

/// **Private** - the node's child objects (empty if none)
fn children_of<'a>(
    node: &'a Map<String, Value>,
    path: &str,
) -> Result<Vec<&'a Map<String, Value>>, CollectError> {
    let Some(value) = node.get(CHILDREN_FIELD) else {
        return Ok(Vec::new());
    };

    let list = value.as_array().ok_or_else(|| {
        CollectError::MalformedTrace(format!("'{}' of {} is not a list", CHILDREN_FIELD, path))
    })?;

    list.iter()
        .map(|child| {
            child.as_object().ok_or_else(|| {
                CollectError::MalformedTrace(format!("child of {} is not an object", path))
            })
        })
        .collect()
}

/// Returns `true` when the record's `path == parent + "/" + tag`
pub fn is_consistent(record: &FlatRecord) -> bool {
    let idx = &record.indices;
    idx.path == child_path(&idx.parent, &idx.tag)
}
