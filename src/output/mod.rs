//! Output writers for collected documents.
//!
//! This module handles writing data to disk:
//! - JSON-lines document sink (one record per line)
//! - Pretty JSON collect results for single traces

pub mod json;
pub mod jsonl;

// Re-export main functions
pub use json::{read_collect_result, write_collect_result};
pub use jsonl::{read_documents, JsonLinesSink};

use crate::parser::FlatRecord;
use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// A destination for flattened documents
pub trait DocumentSink {
    /// Store a batch of documents, returning how many were stored
    fn insert(&mut self, docs: &[FlatRecord]) -> Result<usize, OutputError>;
}

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of an output file if needed
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
