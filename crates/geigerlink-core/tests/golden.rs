use std::fs;
use std::path::{Path, PathBuf};

use std::io::Write;

use geigerlink_core::{AnalysisError, UplinkReport, analyze_uplink_file};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn load_expected_report(dir: &str) -> UplinkReport {
    let expected_path = repo_root().join(dir).join("expected_report.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str) {
    let input = repo_root().join(dir).join("input.jsonl");
    let expected = load_expected_report(dir);

    let mut actual = analyze_uplink_file(&input).expect("analyze uplinks");
    actual.input = expected.input.clone();
    actual.tool.version = expected.tool.version.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_ttn_storage() {
    run_golden("tests/golden/ttn_storage");
}

#[test]
fn golden_ttn_storage_latest_complete() {
    let report = load_expected_report("tests/golden/ttn_storage");
    let latest = report.latest_complete().expect("complete record");
    assert_eq!(latest.reading.cpm, Some(18));
    assert_eq!(latest.reading.usv_h, Some(5.0));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = analyze_uplink_file(&repo_root().join("tests/golden/missing/input.jsonl"));
    assert!(matches!(result, Err(AnalysisError::Io(_))));
}

#[test]
fn invalid_utf8_line_is_skipped() {
    let valid = r#"{"result":{"received_at":"2021-03-05T12:00:00Z","uplink_message":{"f_port":1,"frm_payload":"EAAAAAEA"}}}"#;
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(valid.as_bytes()).expect("write");
    file.write_all(b"\n\xff\xfe garbage\n").expect("write");
    file.write_all(valid.as_bytes()).expect("write");
    file.write_all(b"\n").expect("write");

    let report = analyze_uplink_file(file.path()).expect("analyze uplinks");
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.skipped, 1);
}
