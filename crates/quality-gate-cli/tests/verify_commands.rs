// crates/quality-gate-cli/tests/verify_commands.rs
// ============================================================================
// Module: CLI Verify Command Tests
// Description: Integration tests for the index verification command.
// Purpose: Ensure report layout and exit codes stay stable for CI consumers.
// Dependencies: quality-gate binary
// ============================================================================

//! ## Overview
//! Runs the CLI binary against scratch directories and checks stdout and the
//! `0`/`1`/`2` exit code contract.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn quality_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quality-gate"))
}

/// Runs `quality-gate verify` inside `root` with a clean environment.
fn run_verify(root: &Path, extra: &[&str]) -> Output {
    Command::new(quality_gate_bin())
        .current_dir(root)
        .env_remove("QUALITY_GATE_CONFIG")
        .env_remove("QUALITY_GATE_EVENT_LOG")
        .arg("verify")
        .arg("--root")
        .arg(root)
        .args(extra)
        .output()
        .expect("run verify")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

fn write_index(root: &Path, lines: &[String]) {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(root.join("FILE_INDEX_SHA256.txt"), text).expect("write index");
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn clean_tree_exits_zero_with_count_line_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("empty.bin"), b"").expect("write empty");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    write_index(
        dir.path(),
        &[format!("{EMPTY_SHA256}  empty.bin"), format!("{HELLO_SHA256}  hello.txt")],
    );

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "OK=2  MISSING=0  MISMATCH=0\n");
}

#[test]
fn uppercase_recorded_digest_still_matches() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    write_index(dir.path(), &[format!("{}  hello.txt", HELLO_SHA256.to_uppercase())]);

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "OK=1  MISSING=0  MISMATCH=0\n");
}

#[test]
fn findings_exit_one_and_list_every_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("mkdir");
    fs::write(dir.path().join("src/lib.rs"), b"hello").expect("write lib");
    fs::write(dir.path().join("changed.txt"), b"changed").expect("write changed");
    write_index(
        dir.path(),
        &[
            format!("{HELLO_SHA256}  src/lib.rs"),
            format!("{EMPTY_SHA256}  gone.txt"),
            format!("{HELLO_SHA256}  changed.txt"),
        ],
    );

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "OK=1  MISSING=1  MISMATCH=1");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "[MISSING]");
    assert_eq!(lines[3], "gone.txt");
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "[MISMATCH]");
    assert_eq!(lines[6], "changed.txt");
    assert_eq!(lines[7], format!("  expected={HELLO_SHA256}"));
    assert!(lines[8].starts_with("  got     ="));
    assert_eq!(lines.len(), 9);
}

#[test]
fn missing_index_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("INDEX_MISSING: "), "unexpected stdout: {stdout}");
    assert!(stdout.contains("FILE_INDEX_SHA256.txt"));
    assert!(!stdout.contains("OK="));
}

#[test]
fn missing_index_diagnostic_names_absolute_path_for_relative_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("sub");
    fs::create_dir(&root).expect("mkdir sub");

    let output = Command::new(quality_gate_bin())
        .current_dir(dir.path())
        .env_remove("QUALITY_GATE_CONFIG")
        .env_remove("QUALITY_GATE_EVENT_LOG")
        .args(["verify", "--root", "sub"])
        .output()
        .expect("run verify");

    assert_eq!(output.status.code(), Some(2));
    let expected = fs::canonicalize(&root).expect("canonical root").join("FILE_INDEX_SHA256.txt");
    assert_eq!(stdout_of(&output), format!("INDEX_MISSING: {}\n", expected.display()));
}

#[test]
fn malformed_index_line_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    write_index(dir.path(), &[format!("{HELLO_SHA256}  hello.txt"), "justonetoken".to_string()]);

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_of(&output), "INDEX_LINE_INVALID: justonetoken\n");
}

#[test]
fn directory_target_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("folder")).expect("mkdir");
    write_index(dir.path(), &[format!("{EMPTY_SHA256}  folder")]);

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_of(&output).starts_with("TARGET_UNREADABLE: "));
}

#[test]
fn custom_index_path_is_resolved_against_root() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("meta")).expect("mkdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    fs::write(dir.path().join("meta/index.txt"), format!("{HELLO_SHA256} hello.txt\n"))
        .expect("write index");

    let output = run_verify(dir.path(), &["--index", "meta/index.txt"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "OK=1  MISSING=0  MISMATCH=0\n");
}

#[test]
fn json_format_serializes_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_index(dir.path(), &[format!("{EMPTY_SHA256}  absent.txt")]);

    let output = run_verify(dir.path(), &["--format", "json"]);

    assert_eq!(output.status.code(), Some(1));
    let report: Value = serde_json::from_str(&stdout_of(&output)).expect("json report");
    assert_eq!(report["counts"]["ok"], 0);
    assert_eq!(report["counts"]["missing"], 1);
    assert_eq!(report["missing"][0], "absent.txt");
}

#[test]
fn config_file_supplies_index_and_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    fs::write(dir.path().join("digests.txt"), format!("{HELLO_SHA256}  hello.txt\n"))
        .expect("write index");
    fs::write(
        dir.path().join("quality-gate.toml"),
        "[verify]\nindex = \"digests.txt\"\nformat = \"json\"\n",
    )
    .expect("write config");

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(0));
    let report: Value = serde_json::from_str(&stdout_of(&output)).expect("json report");
    assert_eq!(report["counts"]["ok"], 1);
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    write_index(dir.path(), &[format!("{HELLO_SHA256}  hello.txt")]);
    fs::write(dir.path().join("quality-gate.toml"), "[verify]\nformat = \"json\"\n")
        .expect("write config");

    let output = run_verify(dir.path(), &["--format", "text"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "OK=1  MISSING=0  MISMATCH=0\n");
}

#[test]
fn invalid_config_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_index(dir.path(), &[format!("{EMPTY_SHA256}  absent.txt")]);
    fs::write(dir.path().join("quality-gate.toml"), "[verify]\nunknown = 1\n")
        .expect("write config");

    let output = run_verify(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"), "unexpected stderr: {stderr}");
}

#[test]
fn event_log_file_receives_json_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.txt"), b"hello").expect("write hello");
    write_index(dir.path(), &[format!("{HELLO_SHA256}  hello.txt")]);
    let log_path = dir.path().join("events.jsonl");

    let output = run_verify(dir.path(), &["--event-log", log_path.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_of(&output), "OK=1  MISSING=0  MISMATCH=0\n");
    let log = fs::read_to_string(&log_path).expect("read event log");
    let events: Vec<Value> =
        log.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    let names: Vec<&str> = events.iter().filter_map(|event| event["event"].as_str()).collect();
    assert_eq!(names, vec!["verify_started", "index_parsed", "entry_checked", "verify_finished"]);
    assert_eq!(events[2]["outcome"], "ok");
}
