//! Trace parsing, normalization and schema definitions.
//!
//! This module handles:
//! - Field type rules and their configuration
//! - Normalizing raw string fields into typed values
//! - Splitting traces into base context and root timer
//! - Defining the output document schema

pub mod normalizer;
pub mod profiler_trace;
pub mod rules;
pub mod schema;

// Re-export main types
pub use normalizer::normalize;
pub use profiler_trace::{split_root, SplitTrace, TraceProcessor};
pub use rules::{load_rules, FieldKind, FieldTypeRule, RuleSet};
pub use schema::{CollectResult, FlatRecord, LogPolicy};
