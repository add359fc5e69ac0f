//! Built-In Case Runner Tests.
// crates/quality-gate-cli/tests/case_runners.rs
// ============================================================================
// Module: Built-In Case Runner Tests
// Description: Unit-level coverage for the echo and command runners.
// Purpose: Pin the echoed result shape and command-line parsing.
// Dependencies: quality-gate-cli, quality-gate-core
// ============================================================================

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

use std::path::Path;
use std::path::PathBuf;

use quality_gate_cli::runner::CommandCaseRunner;
use quality_gate_cli::runner::EchoCaseRunner;
use quality_gate_core::CaseRunner;
use quality_gate_core::Profile;
use serde_json::json;

fn profile(document: serde_json::Value) -> Profile {
    Profile::from_document(PathBuf::from("tests/profiles/case.yaml"), document)
        .expect("valid profile")
}

#[test]
fn echo_runner_copies_string_status_and_embeds_profile() {
    let profile = profile(json!({"profile_id": "case", "expected_status": "FAIL", "steps": [1, 2]}));

    let result = EchoCaseRunner.run(&profile, Path::new("."), false).expect("echo result");

    assert_eq!(result.profile_id(), "case");
    assert_eq!(result.expected_status(), Some("FAIL"));
    let document = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        document,
        json!({
            "meta": {"profile_id": "case", "source": "case.yaml"},
            "expected_status": "FAIL",
            "profile": {"profile_id": "case", "expected_status": "FAIL", "steps": [1, 2]}
        })
    );
    let keys: Vec<&String> = result.document().keys().collect();
    assert_eq!(keys, vec!["meta", "expected_status", "profile"]);
}

#[test]
fn echo_runner_ignores_non_string_status() {
    let profile = profile(json!({"profile_id": "case", "expected_status": 3}));

    let result = EchoCaseRunner.run(&profile, Path::new("."), true).expect("echo result");

    assert_eq!(result.expected_status(), None);
    assert_eq!(result.effective_status(), "OK");
}

#[test]
fn command_line_splits_program_and_arguments() {
    let command = vec!["python3".to_string(), "run.py".to_string(), "--fast".to_string()];

    let runner = CommandCaseRunner::from_command_line(&command).expect("runner");

    assert_eq!(runner.program(), "python3");
    assert_eq!(
        runner,
        CommandCaseRunner::new("python3", vec!["run.py".to_string(), "--fast".to_string()])
    );
    assert!(CommandCaseRunner::from_command_line(&[]).is_none());
}

#[test]
fn missing_program_is_a_case_failure() {
    let profile = profile(json!({"profile_id": "case"}));
    let runner = CommandCaseRunner::new("quality-gate-no-such-program", Vec::new());

    let error = runner.run(&profile, Path::new("."), false).expect_err("spawn must fail");

    assert_eq!(error.profile_id, "case");
    assert!(error.message.contains("Failed to start runner"));
}
