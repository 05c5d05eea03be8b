//! Configuration and constants for the collector.

/// Field holding a node's ordered child timers
pub const CHILDREN_FIELD: &str = "children";

/// Field naming a timer node; required at every depth
pub const TAG_FIELD: &str = "tag";

/// Separator used when joining tags into a hierarchical path
pub const PATH_SEPARATOR: &str = "/";

/// Companion run-status file written next to each trace by the test runner
pub const STATUS_FILE_NAME: &str = "runtest.status.json";

/// Log written by the runner for the whole job; kept when the run errored
pub const ERROR_LOG_NAME: &str = "job_output.log";

/// Candidate log files resolved relative to the trace's directory
pub const LOG_FILE_NAMES: &[&str] = &[ERROR_LOG_NAME, "flow123.0.log"];

/// Textual format of `run-started-at` / `run-finished-at` (e.g. `01/02/20 03:04:05`)
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%y %H:%M:%S";

/// Default file-name glob for profiler traces
pub const DEFAULT_INCLUDE: &str = "profiler_info_*.log.json";

/// Default test location, relative to the collection root
pub const DEFAULT_TEST_PATH: &str = "bench_data/benchmarks";

// Built-in field type rules (prefix-anchored regex patterns)
pub const INTEGER_FIELD_PATTERNS: &[&str] = &[
    "call-count-.+",
    "memory-.+",
    "file-line",
    "task-size",
    "run-process-count",
];
pub const FLOAT_FIELD_PATTERNS: &[&str] = &["cumul-time-.+", "percent", "timer-resolution"];
pub const TIMESTAMP_FIELD_PATTERNS: &[&str] = &["run-started-at", "run-finished-at"];
