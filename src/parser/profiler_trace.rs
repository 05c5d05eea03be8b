//! Processing of Flow123d profiler trace files.
//!
//! Reads a `profiler_info_*.log.json` file together with the optional
//! `runtest.status.json` next to it and turns it into a [`CollectResult`]:
//! normalized, flattened records plus the run's log manifest.

use super::normalizer::normalize;
use super::rules::RuleSet;
use super::schema::{is_failure_code, CollectResult, LogPolicy};
use crate::flatten::flatten_trace;
use crate::utils::config::{CHILDREN_FIELD, ERROR_LOG_NAME, LOG_FILE_NAMES, STATUS_FILE_NAME};
use crate::utils::error::CollectError;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// A trace split into run-level context and its single root timer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitTrace {
    /// Top-level fields except `children`
    pub base: Map<String, Value>,

    /// The root timer node; `None` when the profiler recorded no frames
    pub root: Option<Map<String, Value>>,
}

/// Split a normalized trace into base context and root node
///
/// **Public** - used by the processor and tests
///
/// # Errors
/// * `CollectError::MalformedTrace` - `children` is not a one-element list of objects
pub fn split_root(trace: &Map<String, Value>) -> Result<SplitTrace, CollectError> {
    let Some(children) = trace.get(CHILDREN_FIELD) else {
        debug!("Trace has no '{}' field, nothing to flatten", CHILDREN_FIELD);
        return Ok(SplitTrace::default());
    };

    let root = match children.as_array().map(Vec::as_slice) {
        Some([Value::Object(root)]) => root.clone(),
        Some([_]) => {
            return Err(CollectError::MalformedTrace(
                "root timer is not an object".to_string(),
            ))
        }
        Some(list) => {
            return Err(CollectError::MalformedTrace(format!(
                "expected exactly one root timer, found {}",
                list.len()
            )))
        }
        None => {
            return Err(CollectError::MalformedTrace(format!(
                "top-level '{}' is not a list",
                CHILDREN_FIELD
            )))
        }
    };

    let mut base = trace.clone();
    base.remove(CHILDREN_FIELD);

    Ok(SplitTrace {
        base,
        root: Some(root),
    })
}

/// Turns trace files into collect results using an injected rule set
#[derive(Debug, Clone, Default)]
pub struct TraceProcessor {
    rules: RuleSet,
}

impl TraceProcessor {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Process a single trace file
    ///
    /// **Public** - main entry point for one file
    ///
    /// # Arguments
    /// * `path` - Location of the trace, laid out as `<test>/<dir>/<case>/<file>`
    ///
    /// # Returns
    /// All records of the trace and its log manifest; nothing on error
    ///
    /// # Errors
    /// * `CollectError::FileAccess` - Trace or status file cannot be read
    /// * `CollectError::Parse` - Invalid JSON
    /// * `CollectError::MalformedTrace` - Bad tree shape or missing `tag`
    /// * `CollectError::FieldConversion` - A typed field has an unparsable value
    /// * `CollectError::PathLayout` - Test/case names cannot be derived from the path
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<CollectResult, CollectError> {
        let path = path.as_ref();
        info!("Processing trace: {}", path.display());

        let raw = read_json_object(path)?;
        let log_folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let status = load_status(&log_folder)?;

        let trace = normalize(&raw, &self.rules)?;
        let mut split = split_root(&trace)?;

        let (test_name, case_name) = run_names(path)?;
        split.base.insert("test-name".to_string(), Value::String(test_name));
        split.base.insert("case-name".to_string(), Value::String(case_name));
        for (key, value) in &status {
            split.base.insert(key.clone(), value.clone());
        }

        let items = flatten_trace(&split)?;
        let returncode = status.get("returncode").filter(|v| !v.is_null()).cloned();
        let error_log = select_error_log(&log_folder, returncode.as_ref());

        debug!(
            "Collected {} records from {} (returncode {:?})",
            items.len(),
            path.display(),
            returncode
        );

        Ok(CollectResult {
            items,
            log_policy: LogPolicy::OnError,
            logs: LOG_FILE_NAMES.iter().map(|name| log_folder.join(name)).collect(),
            log_folder,
            returncode,
            error_log,
        })
    }
}

/// Read a file expected to hold a single JSON object
fn read_json_object(path: &Path) -> Result<Map<String, Value>, CollectError> {
    let contents = fs::read_to_string(path).map_err(|source| CollectError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| CollectError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(CollectError::MalformedTrace(format!(
            "{} must hold a JSON object, found {}",
            path.display(),
            json_type(&other)
        ))),
    }
}

/// Load the run status next to a trace, or an empty map if there is none
///
/// **Public** - `commit.date` is converted to a UTC date
pub fn load_status(dir: &Path) -> Result<Map<String, Value>, CollectError> {
    let status_file = dir.join(STATUS_FILE_NAME);
    if !status_file.is_file() {
        debug!("No run status at {}", status_file.display());
        return Ok(Map::new());
    }

    let mut status = read_json_object(&status_file)?;
    convert_commit_date(&mut status)?;
    Ok(status)
}

/// Replace a numeric `commit.date` (epoch seconds) with an RFC 3339 UTC date
pub fn convert_commit_date(status: &mut Map<String, Value>) -> Result<(), CollectError> {
    let Some(Value::Object(commit)) = status.get_mut("commit") else {
        return Ok(());
    };
    let Some(date) = commit.get_mut("date") else {
        return Ok(());
    };

    let converted = date
        .as_f64()
        .and_then(epoch_to_datetime)
        .ok_or_else(|| CollectError::FieldConversion {
            field: "commit.date".to_string(),
            value: date.to_string(),
            kind: "epoch timestamp".to_string(),
        })?;

    *date = Value::String(converted.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    Ok(())
}

fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Derive `(test-name, case-name)` from `<test>/<dir>/<case>/<file>`
///
/// The case name is the case directory up to its first `.`.
pub fn run_names(path: &Path) -> Result<(String, String), CollectError> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.len() < 4 {
        return Err(CollectError::PathLayout(path.to_path_buf()));
    }

    let test_name = parts[parts.len() - 4].clone();
    let case_dir = &parts[parts.len() - 2];
    let case_name = case_dir.split('.').next().unwrap_or(case_dir).to_string();

    Ok((test_name, case_name))
}

/// The job log is kept for a failed run if it exists
fn select_error_log(dir: &Path, returncode: Option<&Value>) -> Option<PathBuf> {
    let failed = returncode.is_some_and(is_failure_code);
    let error_file = dir.join(ERROR_LOG_NAME);

    (failed && error_file.is_file()).then_some(error_file)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
