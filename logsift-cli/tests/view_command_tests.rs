//! Integration tests for `logsift view` and `logsift classify`.
//!
//! Runs the built binary against batches written to a temp directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SYSLOG: &str = "\
2025-03-13 07:30:42.035 +0000  3572  3583  D   WificondControl: Scan result ready event
not a syslog line
2025-03-13 07:30:44.000 +0000  3572  3583  E   WifiService: link lost
";

const BOX: &str = r#"{"level":"info","message":"socket connected","meta":{"mac_address":"00:11:22:33:44:55","name":"manager","org_id":"org-1","pid":1234,"process":"box","time_logged":"2025-03-13T07:30:43.000Z"}}
{"level":"warn","message":"missing meta"}
"#;

fn write_batch(dir: &Path) {
    fs::write(dir.join("syslog.txt"), SYSLOG).expect("write syslog");
    fs::write(dir.join("box.log"), BOX).expect("write box");
    fs::write(dir.join("readme.md"), "ignored").expect("write readme");
}

fn logsift(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_logsift"))
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("binary should run")
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_view_merges_batch_in_time_order() {
    let dir = TempDir::new().expect("temp dir");
    write_batch(dir.path());

    let report = json(&logsift(dir.path(), &["view", ".", "--output", "json"]));

    assert_eq!(report["files"]["files_read"].as_u64(), Some(2));
    assert_eq!(report["files"]["files_skipped"].as_u64(), Some(1));
    assert_eq!(report["files"]["records"].as_u64(), Some(5));
    assert_eq!(report["files"]["invalid_records"].as_u64(), Some(2));

    let rows = report["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 5);
    // records without a timestamp sort first, then by instant
    let raw: Vec<&str> = rows
        .iter()
        .filter_map(|row| row["record"]["raw_line"].as_str())
        .collect();
    assert!(raw[2].contains("WificondControl"));
    assert!(raw[3].contains("socket connected"));
    assert!(raw[4].contains("link lost"));
}

#[test]
fn test_view_highlight_marks_matches() {
    let dir = TempDir::new().expect("temp dir");
    write_batch(dir.path());

    let report = json(&logsift(
        dir.path(),
        &["view", ".", "--query", "wifi", "--output", "json"],
    ));

    assert_eq!(report["mode"].as_str(), Some("highlight"));
    assert_eq!(report["match_count"].as_u64(), Some(2));
    assert_eq!(report["rows"].as_array().map(Vec::len), Some(5));
    assert_eq!(report["current_match"].as_u64(), Some(2));
    assert_eq!(report["rows"][2]["current"].as_bool(), Some(true));
    assert_eq!(report["rows"][4]["matched"].as_bool(), Some(true));
}

#[test]
fn test_view_only_matching_with_filters() {
    let dir = TempDir::new().expect("temp dir");
    write_batch(dir.path());

    let report = json(&logsift(
        dir.path(),
        &[
            "view",
            "syslog.txt",
            "box.log",
            "--query",
            "wifi",
            "--only-matching",
            "--severity",
            "debug",
            "--source",
            "syslog",
            "--output",
            "json",
        ],
    ));

    let rows = report["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    let parsed = &rows[0]["record"]["parsed"];
    assert_eq!(parsed["format"].as_str(), Some("syslog"));
    assert_eq!(parsed["meta"]["name"].as_str(), Some("WificondControl"));
    assert!(report["current_match"].is_null());
}

#[test]
fn test_view_date_range_is_inclusive() {
    let dir = TempDir::new().expect("temp dir");
    write_batch(dir.path());

    let report = json(&logsift(
        dir.path(),
        &[
            "view",
            ".",
            "--from",
            "2025-03-13T07:30:43Z",
            "--to",
            "2025-03-13T07:30:44Z",
            "--output",
            "json",
        ],
    ));

    let rows = report["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 2, "timestamp-less records are excluded");
}

#[test]
fn test_view_show_errors_lists_diagnostics() {
    let dir = TempDir::new().expect("temp dir");
    write_batch(dir.path());

    let output = logsift(dir.path(), &["view", "box.log", "--show-errors"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[UNSUPPORTED FORMAT]"));
    assert!(stdout.contains("Validation diagnostics (1):"));
    assert!(stdout.contains("meta"));
}

#[test]
fn test_view_unreadable_batch_exits_with_io_code() {
    let dir = TempDir::new().expect("temp dir");
    let output = logsift(dir.path(), &["view", "missing_syslog.txt"]);
    assert_eq!(output.status.code(), Some(10));
}

#[test]
fn test_view_unrecognized_batch_is_command_error() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("notes.txt"), "x").expect("write");
    let output = logsift(dir.path(), &["view", "notes.txt"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_classify_prefers_box() {
    let dir = TempDir::new().expect("temp dir");
    let report = json(&logsift(
        dir.path(),
        &[
            "classify",
            "syslog_box.txt",
            "SYSLOG.old",
            "dmesg.txt",
            "--output",
            "json",
        ],
    ));

    let files = report["files"].as_array().expect("files");
    assert_eq!(files[0]["source"].as_str(), Some("Box"));
    assert_eq!(files[1]["source"].as_str(), Some("Syslog"));
    assert!(files[2]["source"].is_null());
    assert_eq!(files[2]["classification"].as_str(), Some("Unrecognized"));
}
