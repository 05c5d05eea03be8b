//! Discovery and batch loading of trace files.

pub mod finder;
pub mod loader;

pub use finder::{glob_to_regex, TraceFinder};
pub use loader::{load_data, LoadSummary};
