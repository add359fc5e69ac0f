// crates/quality-gate-cli/src/runner.rs
// ============================================================================
// Module: Built-In Case Runners
// Description: Process-backed and echo case runners for the profile harness.
// Purpose: Execute profiles outside the harness without coupling it to a tool.
// Dependencies: quality-gate-core, serde_json
// ============================================================================

//! ## Overview
//! [`CommandCaseRunner`] spawns an external program once per profile. The
//! profile document is written to the child's stdin as JSON and the child's
//! stdout is parsed as the case result. [`EchoCaseRunner`] needs no external
//! program and reflects each profile back as its own result.
//!
//! ## Invariants
//! - A runner is invoked exactly once per profile and never retried.
//! - Child processes run with the repository root as working directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::process::Stdio;
use std::thread;

use quality_gate_core::CaseExecutionError;
use quality_gate_core::CaseResult;
use quality_gate_core::CaseRunner;
use quality_gate_core::Profile;
use serde_json::Map;
use serde_json::Value;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable carrying the repository root to the child process.
pub const REPO_ROOT_ENV: &str = "QUALITY_GATE_REPO_ROOT";
/// Environment variable carrying the update-expected flag (`1` or `0`).
pub const UPDATE_EXPECTED_ENV: &str = "QUALITY_GATE_UPDATE_EXPECTED";

// ============================================================================
// SECTION: Command Runner
// ============================================================================

/// Runs each profile through an external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCaseRunner {
    /// Program to execute.
    program: String,
    /// Arguments passed before any profile data.
    args: Vec<String>,
}

impl CommandCaseRunner {
    /// Creates a runner for `program` with fixed `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Creates a runner from a full command line, program first.
    ///
    /// Returns `None` for an empty command line.
    #[must_use]
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl CaseRunner for CommandCaseRunner {
    fn run(
        &self,
        profile: &Profile,
        repo_root: &Path,
        update_expected: bool,
    ) -> Result<CaseResult, CaseExecutionError> {
        let payload = serde_json::to_vec(&profile.document).map_err(|err| {
            let message =
                t!("runner.payload_failed", profile = profile.profile_id, error = err);
            case_failure(profile, message)
        })?;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(repo_root)
            .env(REPO_ROOT_ENV, repo_root)
            .env(UPDATE_EXPECTED_ENV, if update_expected { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| {
                case_failure(profile, t!("runner.spawn_failed", program = self.program, error = err))
            })?;

        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || write_payload(stdin, &payload));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output.map_err(|err| {
            case_failure(profile, t!("runner.wait_failed", program = self.program, error = err))
        })?;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                return Err(case_failure(
                    profile,
                    t!("runner.stdin_failed", program = self.program, error = err),
                ));
            }
            Err(_) => {
                return Err(
                    case_failure(profile, t!("runner.writer_panicked", program = self.program))
                );
            }
        }
        if !output.status.success() {
            return Err(case_failure(
                profile,
                t!("runner.exit_failed", program = self.program, status = output.status),
            ));
        }

        let value: Value = serde_json::from_slice(&output.stdout).map_err(|err| {
            case_failure(profile, t!("runner.output_invalid", program = self.program, error = err))
        })?;
        CaseResult::from_value(value).map_err(|err| {
            case_failure(profile, t!("runner.output_invalid", program = self.program, error = err))
        })
    }
}

/// Builds an execution error attributed to `profile`.
fn case_failure(profile: &Profile, message: String) -> CaseExecutionError {
    CaseExecutionError::new(profile.profile_id.clone(), message)
}

/// Writes the profile payload to the child's stdin and closes it.
///
/// A child that exits without reading its input is not an error here; its
/// exit status and output decide the case.
fn write_payload(stdin: Option<std::process::ChildStdin>, payload: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(payload).and_then(|()| stdin.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

// ============================================================================
// SECTION: Echo Runner
// ============================================================================

/// Reflects each profile back as its own case result.
///
/// The result carries `meta.profile_id` and `meta.source`, copies a string
/// `expected_status` from the profile, and embeds the full profile under
/// `profile`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EchoCaseRunner;

/// Profile field copied into the echoed result when it is a string.
const EXPECTED_STATUS_FIELD: &str = "expected_status";

impl CaseRunner for EchoCaseRunner {
    fn run(
        &self,
        profile: &Profile,
        _repo_root: &Path,
        _update_expected: bool,
    ) -> Result<CaseResult, CaseExecutionError> {
        let mut result = CaseResult::new(profile.profile_id.clone());
        if let Some(Value::String(status)) = profile.document.get(EXPECTED_STATUS_FIELD) {
            result = result.with_expected_status(status.clone());
        }
        let mut meta = Map::new();
        meta.insert("profile_id".to_string(), Value::String(profile.profile_id.clone()));
        let source = profile.file_name().map_or_else(
            || profile.source.display().to_string(),
            ToString::to_string,
        );
        meta.insert("source".to_string(), Value::String(source));
        let mut document = result.document().clone();
        document.insert("meta".to_string(), Value::Object(meta));
        document.insert("profile".to_string(), Value::Object(profile.document.clone()));
        CaseResult::from_value(Value::Object(document))
            .map_err(|err| CaseExecutionError::new(profile.profile_id.clone(), err.to_string()))
    }
}
