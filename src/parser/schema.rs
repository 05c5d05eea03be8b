//! Output document definitions for flattened traces.
//!
//! This module defines the structure of the documents handed to a sink:
//! one [`FlatRecord`] per timer node, bundled with the log manifest of the
//! run it came from.

use crate::flatten::identity::Indices;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One flattened timer node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// The node's own scalar fields (children stripped)
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Run-level context, an independent copy per record
    pub base: Map<String, Value>,

    /// Identity block locating the node in the call tree
    pub indices: Indices,
}

/// When the logs of a run should be kept alongside its documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPolicy {
    Always,
    OnError,
    Never,
}

/// Everything collected from a single trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectResult {
    /// Flattened records in pre-order
    pub items: Vec<FlatRecord>,

    /// Log retention policy for this run
    pub log_policy: LogPolicy,

    /// Directory containing the trace and its logs
    pub log_folder: PathBuf,

    /// Candidate log files (existence not guaranteed)
    pub logs: Vec<PathBuf>,

    /// Exit code recorded in the run status; `None` when absent or null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returncode: Option<Value>,

    /// Error log found next to a failed run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_log: Option<PathBuf>,
}

impl CollectResult {
    /// Whether the run status reports a failure
    pub fn errored(&self) -> bool {
        self.returncode.as_ref().is_some_and(is_failure_code)
    }

    /// Existing log files that should be kept under the current policy
    pub fn retained_logs(&self) -> Vec<PathBuf> {
        let keep = match self.log_policy {
            LogPolicy::Always => true,
            LogPolicy::OnError => self.errored(),
            LogPolicy::Never => false,
        };

        if !keep {
            return Vec::new();
        }

        self.logs
            .iter()
            .filter(|p| Path::new(p).is_file())
            .cloned()
            .collect()
    }
}

/// Any exit code other than null or zero marks a failed run
///
/// Codes that are not integers (`"1"`, `1.5`, `true`) count as failures;
/// `0.0` and `false` equal zero and do not.
pub fn is_failure_code(code: &Value) -> bool {
    match code {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}
