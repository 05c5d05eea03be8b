//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//! Underlying causes are exposed through `source()` only, so `{:#}` prints
//! each link of the chain once.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the processing of a single trace file
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Cannot access {}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed trace: {0}")]
    MalformedTrace(String),

    #[error("Field '{field}' value {value} is not a valid {kind}")]
    FieldConversion {
        field: String,
        value: String,
        kind: String,
    },

    #[error("Trace path does not follow <test>/<dir>/<case>/<file> layout: {}", .0.display())]
    PathLayout(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while building or applying a field rule set
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid rule pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{pattern}' is declared as both {first} and {second}")]
    AmbiguousRule {
        pattern: String,
        first: String,
        second: String,
    },

    #[error("Field '{field}' matches both {first} and {second} rules")]
    AmbiguousField {
        field: String,
        first: String,
        second: String,
    },

    #[error("Cannot read rule file")]
    Io(#[from] std::io::Error),

    #[error("Rule TOML parse error")]
    Toml(#[from] toml::de::Error),
}

/// Errors that can occur during document output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
