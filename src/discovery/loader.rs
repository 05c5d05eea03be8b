//! Batch loading of every trace under a test path.

use super::finder::TraceFinder;
use crate::parser::{FlatRecord, TraceProcessor};
use crate::utils::error::CollectError;
use log::{info, warn};
use std::path::Path;

/// Outcome of loading one test path
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Records from every trace that processed cleanly
    pub items: Vec<FlatRecord>,

    /// Number of trace files found
    pub files: usize,

    /// Files skipped because processing failed
    pub failed: usize,
}

/// Process every trace found under `root`
///
/// A file that fails is logged and skipped; it contributes no records.
///
/// # Errors
/// * `CollectError::FileAccess` - `root` itself cannot be listed
pub fn load_data(
    root: impl AsRef<Path>,
    finder: &TraceFinder,
    processor: &TraceProcessor,
) -> Result<LoadSummary, CollectError> {
    let root = root.as_ref();
    let files = finder.find(root)?;

    let mut summary = LoadSummary {
        files: files.len(),
        ..Default::default()
    };

    for file in &files {
        match processor.process_file(file) {
            Ok(result) => summary.items.extend(result.items),
            Err(e) => {
                warn!("Skipping {}: {:#}", file.display(), anyhow::Error::new(e));
                summary.failed += 1;
            }
        }
    }

    info!(
        "Loaded {} records from {} files under {} ({} skipped)",
        summary.items.len(),
        summary.files,
        root.display(),
        summary.failed
    );

    Ok(summary)
}
