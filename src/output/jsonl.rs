//! JSON-lines document sink.
//!
//! Each flattened record is written as one compact JSON document per line,
//! a format most document stores can bulk-import directly.

use super::{ensure_parent, validate_path, DocumentSink};
use crate::parser::FlatRecord;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends documents to a `.jsonl` file
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
    written: usize,
}

impl JsonLinesSink {
    /// Open a sink at `path`, truncating any previous content
    pub fn create(path: impl AsRef<Path>) -> Result<Self, OutputError> {
        let path = path.as_ref();
        validate_path(path)?;
        ensure_parent(path)?;

        File::create(path)?;
        info!("Writing documents to: {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total documents written through this sink
    pub fn written(&self) -> usize {
        self.written
    }
}

impl DocumentSink for JsonLinesSink {
    fn insert(&mut self, docs: &[FlatRecord]) -> Result<usize, OutputError> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for doc in docs {
            serde_json::to_writer(&mut writer, doc)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        self.written += docs.len();
        debug!("Inserted {} documents into {}", docs.len(), self.path.display());
        Ok(docs.len())
    }
}

/// Read every document from a JSON-lines file
///
/// **Public** - useful for validation and testing
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Value>, OutputError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        docs.push(serde_json::from_str(&line)?);
    }

    Ok(docs)
}
