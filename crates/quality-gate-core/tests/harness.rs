// crates/quality-gate-core/tests/harness.rs
// ============================================================================
// Module: Profile Harness Tests
// Description: Discovery order, case execution, persistence, and summaries.
// ============================================================================
//! ## Overview
//! Runs the harness with closure-based case runners over temporary profile
//! directories and checks the persisted results document and summary.

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

use std::cell::Cell;
use std::fs;
use std::path::Path;

use quality_gate_core::CaseExecutionError;
use quality_gate_core::CaseResult;
use quality_gate_core::Harness;
use quality_gate_core::HarnessError;
use quality_gate_core::HarnessRequest;
use quality_gate_core::MemoryEventSink;
use quality_gate_core::NoopEventSink;
use quality_gate_core::Profile;
use quality_gate_core::ProfileLoadError;
use quality_gate_core::RunEventKind;
use quality_gate_core::profile::discover_profiles;
use quality_gate_core::results::summarize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

type RunnerResult = Result<CaseResult, CaseExecutionError>;

fn write_profile(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

fn request(root: &Path) -> HarnessRequest {
    HarnessRequest {
        repo_root: root.to_path_buf(),
        profiles_dir: root.join("tests/profiles"),
        out_path: root.join("tests/out/results.json"),
        update_expected: false,
    }
}

fn echo_runner(
    profile: &Profile,
    _repo_root: &Path,
    _update_expected: bool,
) -> RunnerResult {
    Ok(CaseResult::new(profile.profile_id.clone()))
}

fn read_results(path: &Path) -> Vec<Value> {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn profiles_dir(root: &Path) -> std::path::PathBuf {
    let dir = root.join("tests/profiles");
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

#[test]
fn test_results_follow_filename_order() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "b.yaml", "profile_id: b\n");
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    write_profile(&dir, "c.yaml", "profile_id: c\n");
    let harness = Harness::new(&echo_runner, &NoopEventSink);

    let outcome = harness.run(&request(root.path())).unwrap();

    let ids: Vec<&str> = outcome.results.iter().map(CaseResult::profile_id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    let persisted = read_results(&root.path().join("tests/out/results.json"));
    let persisted_ids: Vec<&str> =
        persisted.iter().map(|value| value["meta"]["profile_id"].as_str().unwrap()).collect();
    assert_eq!(persisted_ids, vec!["a", "b", "c"]);
}

#[test]
fn test_discovery_ignores_other_files_and_directories() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "one.yml", "profile_id: one\n");
    write_profile(&dir, "notes.txt", "not a profile");
    fs::create_dir(dir.join("nested.yaml")).unwrap();

    let profiles = discover_profiles(&dir).unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].profile_id, "one");
    assert_eq!(profiles[0].file_name(), Some("one.yml"));
}

#[test]
fn test_discovery_skips_hidden_profile_files() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, ".hidden.yaml", "profile_id: h\n");
    write_profile(&dir, ".draft.yml", "profile_id: d\n");
    write_profile(&dir, "b.yml", "profile_id: b\n");
    write_profile(&dir, "a.yaml", "profile_id: a\n");

    let profiles = discover_profiles(&dir).unwrap();

    let ids: Vec<&str> = profiles.iter().map(|profile| profile.profile_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_profile_body_keeps_source_key_order() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "p.yaml", "zeta: 1\nprofile_id: p\nalpha:\n  nested: true\n");

    let profiles = discover_profiles(&dir).unwrap();

    let keys: Vec<&str> = profiles[0].document.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "profile_id", "alpha"]);
    assert_eq!(profiles[0].document["alpha"], json!({"nested": true}));
}

#[test]
fn test_missing_profile_directory_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let harness = Harness::new(&echo_runner, &NoopEventSink);

    let err = harness.run(&request(root.path())).unwrap_err();

    assert!(matches!(err, HarnessError::ProfileLoad(ProfileLoadError::DirectoryUnreadable { .. })));
    assert!(!root.path().join("tests/out/results.json").exists());
}

#[test]
fn test_malformed_profile_aborts_without_results() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    write_profile(&dir, "b.yaml", "profile_id: [unterminated\n");
    let calls = Cell::new(0usize);
    let runner = |profile: &Profile, _root: &Path, _update: bool| -> RunnerResult {
        calls.set(calls.get() + 1);
        Ok(CaseResult::new(profile.profile_id.clone()))
    };
    let harness = Harness::new(&runner, &NoopEventSink);

    let err = harness.run(&request(root.path())).unwrap_err();

    assert!(matches!(err, HarnessError::ProfileLoad(ProfileLoadError::Parse { .. })));
    assert_eq!(calls.get(), 0);
    assert!(!root.path().join("tests/out/results.json").exists());
}

#[test]
fn test_profile_without_id_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "name: nameless\n");
    write_profile(&dir, "b.yaml", "- just\n- a list\n");

    let err = discover_profiles(&dir).unwrap_err();

    assert!(matches!(err, ProfileLoadError::MissingProfileId { .. }));
    fs::remove_file(dir.join("a.yaml")).unwrap();
    let err = discover_profiles(&dir).unwrap_err();
    assert!(matches!(err, ProfileLoadError::NotAMapping { .. }));
}

// ============================================================================
// SECTION: Case Execution
// ============================================================================

#[test]
fn test_runner_receives_repo_root_and_update_flag() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\nsteps: [1, 2]\n");
    let expected_root = root.path().to_path_buf();
    let runner = |profile: &Profile, repo_root: &Path, update: bool| -> RunnerResult {
        assert_eq!(repo_root, expected_root.as_path());
        assert!(update);
        assert_eq!(profile.document["steps"], json!([1, 2]));
        Ok(CaseResult::new(profile.profile_id.clone()).with_field("updated", Value::Bool(update)))
    };
    let harness = Harness::new(&runner, &NoopEventSink);
    let mut request = request(root.path());
    request.update_expected = true;

    let outcome = harness.run(&request).unwrap();

    assert_eq!(outcome.results[0].document()["updated"], Value::Bool(true));
}

#[test]
fn test_runner_failure_propagates_without_results() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    write_profile(&dir, "b.yaml", "profile_id: b\n");
    let calls = Cell::new(0usize);
    let runner = |profile: &Profile, _root: &Path, _update: bool| -> RunnerResult {
        calls.set(calls.get() + 1);
        Err(CaseExecutionError::new(profile.profile_id.clone(), "boom"))
    };
    let harness = Harness::new(&runner, &NoopEventSink);

    let err = harness.run(&request(root.path())).unwrap_err();

    let HarnessError::CaseExecution(inner) = err else {
        panic!("expected case execution error");
    };
    assert_eq!(inner.profile_id, "a");
    assert_eq!(calls.get(), 1, "failures are not retried and later cases do not run");
    assert!(!root.path().join("tests/out/results.json").exists());
}

#[test]
fn test_result_for_wrong_profile_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    let runner = |_profile: &Profile, _root: &Path, _update: bool| -> RunnerResult {
        Ok(CaseResult::new("other"))
    };
    let harness = Harness::new(&runner, &NoopEventSink);

    let err = harness.run(&request(root.path())).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::ProfileIdMismatch { ref expected, ref actual, .. }
            if expected == "a" && actual == "other"
    ));
}

// ============================================================================
// SECTION: Summary
// ============================================================================

#[test]
fn test_missing_expected_status_defaults_to_ok() {
    let results =
        vec![CaseResult::new("plain"), CaseResult::new("failing").with_expected_status("FAIL")];

    let summary = summarize(&results);

    assert_eq!(summary.get("plain"), Some("OK"));
    assert_eq!(summary.get("failing"), Some("FAIL"));
}

#[test]
fn test_duplicate_profile_id_keeps_later_status_in_first_position() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "1-first.yaml", "profile_id: shared\nstatus: FIRST\n");
    write_profile(&dir, "2-middle.yaml", "profile_id: middle\n");
    write_profile(&dir, "3-second.yaml", "profile_id: shared\nstatus: SECOND\n");
    let runner = |profile: &Profile, _root: &Path, _update: bool| -> RunnerResult {
        let result = CaseResult::new(profile.profile_id.clone());
        Ok(match profile.document.get("status").and_then(Value::as_str) {
            Some(status) => result.with_expected_status(status),
            None => result,
        })
    };
    let harness = Harness::new(&runner, &NoopEventSink);

    let outcome = harness.run(&request(root.path())).unwrap();

    assert_eq!(outcome.results.len(), 3);
    let rendered = serde_json::to_string(&outcome.summary).unwrap();
    assert_eq!(rendered, r#"{"shared":"SECOND","middle":"OK"}"#);
    let rows: Vec<(&str, &str)> = outcome
        .summary
        .entries()
        .iter()
        .map(|entry| (entry.profile_id.as_str(), entry.expected_status.as_str()))
        .collect();
    assert_eq!(rows, vec![("shared", "SECOND"), ("middle", "OK")]);
}

// ============================================================================
// SECTION: Persistence and Events
// ============================================================================

#[test]
fn test_persisted_document_is_pretty_and_keeps_runner_fields() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    let runner = |_profile: &Profile, _root: &Path, _update: bool| -> RunnerResult {
        CaseResult::from_value(json!({
            "meta": {"profile_id": "a", "runner": "stub"},
            "checks": ["ünïcödé"],
        }))
        .map_err(|err| CaseExecutionError::new("a", err.to_string()))
    };
    let harness = Harness::new(&runner, &NoopEventSink);

    harness.run(&request(root.path())).unwrap();

    let text = fs::read_to_string(root.path().join("tests/out/results.json")).unwrap();
    assert!(text.starts_with("[\n  {\n    \"meta\": {"));
    assert!(text.contains("ünïcödé"));
    assert!(text.ends_with("]\n"));
    let persisted = read_results(&root.path().join("tests/out/results.json"));
    assert_eq!(persisted[0]["meta"]["runner"], "stub");
}

#[test]
fn test_empty_profile_directory_writes_empty_document() {
    let root = tempfile::tempdir().unwrap();
    profiles_dir(root.path());
    let harness = Harness::new(&echo_runner, &NoopEventSink);

    let outcome = harness.run(&request(root.path())).unwrap();

    assert!(outcome.summary.is_empty());
    assert!(read_results(&root.path().join("tests/out/results.json")).is_empty());
}

#[test]
fn test_harness_emits_events_in_pipeline_order() {
    let root = tempfile::tempdir().unwrap();
    let dir = profiles_dir(root.path());
    write_profile(&dir, "a.yaml", "profile_id: a\n");
    let sink = MemoryEventSink::new();
    let harness = Harness::new(&echo_runner, &sink);

    harness.run(&request(root.path())).unwrap();

    let kinds = sink.kinds();
    assert_eq!(kinds.len(), 4);
    assert!(matches!(kinds[0], RunEventKind::ProfilesDiscovered { count: 1, .. }));
    assert_eq!(
        kinds[1],
        RunEventKind::CaseCompleted {
            profile_id: "a".to_string(),
            expected_status: "OK".to_string(),
        }
    );
    assert!(matches!(kinds[2], RunEventKind::ResultsPersisted { results: 1, .. }));
    assert_eq!(
        kinds[3],
        RunEventKind::HarnessFinished {
            cases: 1,
            summarized: 1,
        }
    );
}
