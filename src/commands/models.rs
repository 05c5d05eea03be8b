use crate::utils::config::{DEFAULT_INCLUDE, DEFAULT_TEST_PATH};
use std::path::PathBuf;

/// Arguments for the collect command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CollectArgs {
    /// Root the test paths are relative to
    pub root: PathBuf,

    /// Test paths to search for traces
    pub tests: Vec<PathBuf>,

    /// File-name glob for trace files
    pub include: String,

    /// File-name glob of files to skip
    pub exclude: Option<String>,

    /// Only collect files whose path contains this run tag
    pub tag: Option<String>,

    /// Optional TOML rule file replacing the built-in field rules
    pub rules: Option<PathBuf>,

    /// JSON-lines file receiving the documents
    pub output: PathBuf,
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            tests: vec![PathBuf::from(DEFAULT_TEST_PATH)],
            include: DEFAULT_INCLUDE.to_string(),
            exclude: None,
            tag: None,
            rules: None,
            output: PathBuf::from("artifacts/documents.jsonl"),
        }
    }
}

/// Arguments for the process command
#[derive(Debug, Clone, Default)]
pub struct ProcessArgs {
    /// Trace file to process
    pub file: PathBuf,

    /// Optional TOML rule file replacing the built-in field rules
    pub rules: Option<PathBuf>,

    /// Where to write the collect result (stdout if omitted)
    pub output: Option<PathBuf>,
}
