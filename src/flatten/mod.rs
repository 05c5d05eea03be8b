//! Flattening of trace trees into indexed records.
//!
//! This module transforms normalized trace trees into:
//! - One flat record per timer node (pre-order)
//! - Identity blocks with MD5 path hashes for cross-run joins

pub mod identity;
pub mod unwind;

// Re-export main types and functions
pub use identity::{md5_hex, Indices};
pub use unwind::{flatten, flatten_trace, is_consistent};
