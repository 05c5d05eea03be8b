use flow_collect::discovery::{load_data, TraceFinder};
use flow_collect::parser::TraceProcessor;
use flow_collect::utils::error::CollectError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn trace(tag: &str) -> String {
    json!({"children": [{"tag": tag, "children": [{"tag": "assembly"}]}]}).to_string()
}

#[test]
fn test_find_default_include() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    touch(&root.join("01_cube/out/cube.1/profiler_info_1.log.json"), "{}");
    touch(&root.join("01_cube/out/cube.1/runtest.status.json"), "{}");
    touch(&root.join("02_sq/out/sq.1/profiler_info_2.log.json"), "{}");
    touch(&root.join(".hidden/out/x.1/profiler_info_3.log.json"), "{}");

    let files = TraceFinder::default().find(root).unwrap();

    assert_eq!(
        files,
        vec![
            root.join("01_cube/out/cube.1/profiler_info_1.log.json"),
            root.join("02_sq/out/sq.1/profiler_info_2.log.json"),
        ]
    );
}

#[test]
fn test_find_with_exclude_and_tag() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    touch(&root.join("t/run-a1b2/c.1/profiler_info_1.log.json"), "{}");
    touch(&root.join("t/run-a1b2/c.1/profiler_info_2.log.json"), "{}");
    touch(&root.join("t/run-ffff/c.1/profiler_info_1.log.json"), "{}");

    let finder = TraceFinder::new("profiler_info_*.log.json", Some("*_2.log.json"))
        .unwrap()
        .with_token("a1b2");

    assert_eq!(
        finder.find(root).unwrap(),
        vec![root.join("t/run-a1b2/c.1/profiler_info_1.log.json")]
    );
}

#[test]
fn test_find_single_file_root() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("profiler_info_9.log.json");
    touch(&file, "{}");

    assert_eq!(TraceFinder::default().find(&file).unwrap(), vec![file]);
}

#[test]
fn test_find_missing_root() {
    let tmp = TempDir::new().unwrap();
    let err = TraceFinder::default().find(tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, CollectError::FileAccess { .. }));
}

#[test]
fn test_load_data_skips_broken_files() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    touch(&root.join("01_ok/out/ok.1/profiler_info_1.log.json"), &trace("whole-program"));
    touch(&root.join("02_bad/out/bad.1/profiler_info_1.log.json"), "{ broken");
    touch(&root.join("03_ok/out/ok.2/profiler_info_1.log.json"), &trace("Whole Program"));

    let summary = load_data(root, &TraceFinder::default(), &TraceProcessor::default()).unwrap();

    assert_eq!(summary.files, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.items.len(), 4);
    assert_eq!(summary.items[0].base["test-name"], json!("01_ok"));
    assert_eq!(summary.items[2].indices.path, "/Whole Program");
}
