//! JSON collect-result writer.
//!
//! Writes the full result of one trace (records plus log manifest) as a
//! pretty-printed JSON file.

use super::{ensure_parent, validate_path};
use crate::parser::CollectResult;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a collect result to a JSON file
///
/// **Public** - main entry point for single-trace output
///
/// # Arguments
/// * `result` - Collect result to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_collect_result(
    result: &CollectResult,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing collect result to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result).map_err(OutputError::SerializationFailed)?;

    info!(
        "Collect result written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a collect result from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_collect_result(input_path: impl AsRef<Path>) -> Result<CollectResult, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading collect result from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let result: CollectResult =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Collect result loaded: {} records from {}",
        result.items.len(),
        result.log_folder.display()
    );

    Ok(result)
}
