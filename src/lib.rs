//! Flow Collect
//!
//! Flattens hierarchical Flow123d profiler traces into indexed documents
//! for storage and cross-run benchmark aggregation.
//!
//! Every timer node becomes one document carrying its own fields, the run's
//! base context, and MD5 hashes of its position in the call tree, so the
//! same position can be joined across runs.
//!
//! ```ignore
//! use flow_collect::parser::TraceProcessor;
//!
//! let result = TraceProcessor::default().process_file("profiler_info_1.log.json")?;
//! for record in &result.items {
//!     println!("{}", record.indices.path);
//! }
//! ```

pub mod commands;
pub mod discovery;
pub mod flatten;
pub mod output;
pub mod parser;
pub mod utils;
