//! CLI command implementations.
//!
//! Commands orchestrate the various library components to perform user tasks.

pub mod collect;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use collect::{execute_collect, execute_process, validate_args};
pub use models::{CollectArgs, ProcessArgs};
pub use utils::{display_rules, display_version, load_rule_set};
