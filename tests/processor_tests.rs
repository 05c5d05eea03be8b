use flow_collect::parser::{FieldKind, FieldTypeRule, LogPolicy, RuleSet, TraceProcessor};
use flow_collect::utils::error::{CollectError, ConfigError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Lay out `<root>/<test>/test_results/<case>/profiler_info_1.log.json`
fn write_trace(root: &Path, test: &str, case: &str, trace: &Value) -> PathBuf {
    let dir = root.join(test).join("test_results").join(case);
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join("profiler_info_1.log.json");
    fs::write(&file, serde_json::to_string(trace).unwrap()).unwrap();
    file
}

fn sample_trace() -> Value {
    json!({
        "program-name": "Flow123d",
        "run-started-at": "01/02/20 03:04:05",
        "run-finished-at": "01/02/20 03:05:05",
        "timer-resolution": "1e-06",
        "children": [{
            "tag": "Whole Program",
            "call-count-sum": "1",
            "cumul-time-max": "60.0",
            "children": [{"tag": "assembly", "call-count-sum": "12", "file-line": "88"}]
        }]
    })
}

#[test]
fn test_process_file_without_status() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "01_square", "square.1", &sample_trace());

    let result = TraceProcessor::default().process_file(&file).unwrap();
    let folder = file.parent().unwrap().to_path_buf();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.log_policy, LogPolicy::OnError);
    assert_eq!(result.log_folder, folder);
    assert_eq!(
        result.logs,
        vec![folder.join("job_output.log"), folder.join("flow123.0.log")]
    );
    assert_eq!(result.returncode, None);
    assert_eq!(result.error_log, None);

    let root = &result.items[0];
    assert_eq!(root.base["test-name"], json!("01_square"));
    assert_eq!(root.base["case-name"], json!("square"));
    assert_eq!(root.base["run-finished-at"], json!(1577934305));
    assert_eq!(root.base["timer-resolution"], json!(1e-06));
    assert_eq!(root.fields["cumul-time-max"], json!(60.0));
    assert_eq!(result.items[1].fields["file-line"], json!(88));
}

#[test]
fn test_status_is_merged_into_base() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "02_cube", "cube_123.4", &sample_trace());
    let status = json!({
        "returncode": 0,
        "program-name": "overridden",
        "commit": {"date": 1577934245, "hash": "abc123"}
    });
    fs::write(file.parent().unwrap().join("runtest.status.json"), status.to_string()).unwrap();

    let result = TraceProcessor::default().process_file(&file).unwrap();

    for record in &result.items {
        assert_eq!(record.base["returncode"], json!(0));
        assert_eq!(record.base["program-name"], json!("overridden"));
        assert_eq!(record.base["commit"]["date"], json!("2020-01-02T03:04:05Z"));
        assert_eq!(record.base["commit"]["hash"], json!("abc123"));
        assert_eq!(record.base["case-name"], json!("cube_123"));
    }
    assert_eq!(result.returncode, Some(json!(0)));
    assert!(!result.errored());
}

#[test]
fn test_error_log_selected_for_failed_run() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "03_flow", "flow.1", &sample_trace());
    let folder = file.parent().unwrap();
    fs::write(folder.join("runtest.status.json"), r#"{"returncode": 1}"#).unwrap();
    fs::write(folder.join("job_output.log"), "segfault").unwrap();

    let result = TraceProcessor::default().process_file(&file).unwrap();

    assert_eq!(result.error_log, Some(folder.join("job_output.log")));
    assert_eq!(result.retained_logs(), vec![folder.join("job_output.log")]);
}

#[test]
fn test_error_log_needs_existing_file() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "03_flow", "flow.1", &sample_trace());
    fs::write(
        file.parent().unwrap().join("runtest.status.json"),
        r#"{"returncode": 3}"#,
    )
    .unwrap();

    let result = TraceProcessor::default().process_file(&file).unwrap();
    assert_eq!(result.error_log, None);
    assert!(result.errored());
    assert!(result.retained_logs().is_empty());
}

#[test]
fn test_non_integer_returncode_is_a_failure() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "03_flow", "flow.1", &sample_trace());
    let folder = file.parent().unwrap();
    fs::write(folder.join("runtest.status.json"), r#"{"returncode": "1"}"#).unwrap();
    fs::write(folder.join("job_output.log"), "killed").unwrap();

    let result = TraceProcessor::default().process_file(&file).unwrap();

    assert_eq!(result.returncode, Some(json!("1")));
    assert!(result.errored());
    assert_eq!(result.error_log, Some(folder.join("job_output.log")));
}

#[test]
fn test_null_returncode_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "03_flow", "flow.1", &sample_trace());
    let folder = file.parent().unwrap();
    fs::write(folder.join("runtest.status.json"), r#"{"returncode": null}"#).unwrap();
    fs::write(folder.join("job_output.log"), "ok").unwrap();

    let result = TraceProcessor::default().process_file(&file).unwrap();
    assert_eq!(result.error_log, None);
    assert_eq!(result.items[0].base["returncode"], Value::Null);
}

#[test]
fn test_degenerate_trace_yields_no_items() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "04_empty", "empty.1", &json!({}));

    let result = TraceProcessor::default().process_file(&file).unwrap();
    assert!(result.items.is_empty());
}

#[test]
fn test_missing_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("a/b/c/profiler_info_1.log.json");

    let err = TraceProcessor::default().process_file(&missing).unwrap_err();
    assert!(matches!(err, CollectError::FileAccess { .. }));
}

#[test]
fn test_invalid_json() {
    let tmp = TempDir::new().unwrap();
    let file = write_trace(tmp.path(), "05_bad", "bad.1", &json!({}));
    fs::write(&file, "{ not json").unwrap();

    let err = TraceProcessor::default().process_file(&file).unwrap_err();
    assert!(matches!(err, CollectError::Parse { .. }));
}

#[test]
fn test_missing_tag_aborts_whole_file() {
    let tmp = TempDir::new().unwrap();
    let trace = json!({"children": [{"tag": "root", "children": [{"call-count-sum": "1"}]}]});
    let file = write_trace(tmp.path(), "06_notag", "notag.1", &trace);

    let err = TraceProcessor::default().process_file(&file).unwrap_err();
    assert!(matches!(err, CollectError::MalformedTrace(_)));
}

#[test]
fn test_corrupted_field_aborts_whole_file() {
    let tmp = TempDir::new().unwrap();
    let trace = json!({"children": [{"tag": "root", "cumul-time-sum": "fast"}]});
    let file = write_trace(tmp.path(), "07_corrupt", "corrupt.1", &trace);

    let err = TraceProcessor::default().process_file(&file).unwrap_err();
    assert!(matches!(err, CollectError::FieldConversion { ref field, .. } if field == "cumul-time-sum"));
}

#[test]
fn test_custom_rules_are_injected() {
    let tmp = TempDir::new().unwrap();
    let trace = json!({"children": [{"tag": "root", "thread-count": "8", "call-count-sum": "1"}]});
    let file = write_trace(tmp.path(), "08_rules", "rules.1", &trace);

    let rules = RuleSet::new(vec![FieldTypeRule::new("thread-count", FieldKind::Integer).unwrap()]).unwrap();
    let result = TraceProcessor::new(rules).process_file(&file).unwrap();

    assert_eq!(result.items[0].fields["thread-count"], json!(8));
    // Not covered by the injected rules, so left as text
    assert_eq!(result.items[0].fields["call-count-sum"], json!("1"));
}

#[test]
fn test_ambiguous_field_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let trace = json!({"children": [{"tag": "root", "cumul-time-sum": "1"}]});
    let file = write_trace(tmp.path(), "09_ambiguous", "amb.1", &trace);

    let rules = RuleSet::new(vec![
        FieldTypeRule::new("cumul-.+", FieldKind::Integer).unwrap(),
        FieldTypeRule::new("cumul-time-.+", FieldKind::Float).unwrap(),
    ])
    .unwrap();

    let err = TraceProcessor::new(rules).process_file(&file).unwrap_err();
    assert!(matches!(
        err,
        CollectError::Config(ConfigError::AmbiguousField { .. })
    ));
}
