// crates/quality-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Quality Gate Interfaces
// Description: Collaborator boundary for executing test profiles.
// Purpose: Keep case execution replaceable without touching discovery or aggregation.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The harness never interprets a profile body. Executing a profile is owned
//! by a [`CaseRunner`], which may be a process adapter, an in-process
//! implementation, or a test double. Any `Fn(&Profile, &Path, bool)` closure
//! with the right return type is a runner too.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use thiserror::Error;

use crate::core::CaseResult;
use crate::core::Profile;

// ============================================================================
// SECTION: Case Runner
// ============================================================================

/// Failure surfaced by a case runner. Never retried by the harness.
#[derive(Debug, Error)]
#[error("case {profile_id} failed: {message}")]
pub struct CaseExecutionError {
    /// Identifier of the profile that failed.
    pub profile_id: String,
    /// Runner-provided failure description.
    pub message: String,
}

impl CaseExecutionError {
    /// Creates an execution error for `profile_id`.
    #[must_use]
    pub fn new(profile_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            message: message.into(),
        }
    }
}

/// Executes a single test profile.
pub trait CaseRunner {
    /// Runs `profile` against `repo_root`.
    ///
    /// `update_expected` is passed through untouched; its meaning (for
    /// example regenerating stored snapshots) belongs to the runner.
    ///
    /// # Errors
    ///
    /// Returns [`CaseExecutionError`] when the case cannot be executed.
    fn run(
        &self,
        profile: &Profile,
        repo_root: &Path,
        update_expected: bool,
    ) -> Result<CaseResult, CaseExecutionError>;
}

impl<F> CaseRunner for F
where
    F: Fn(&Profile, &Path, bool) -> Result<CaseResult, CaseExecutionError>,
{
    fn run(
        &self,
        profile: &Profile,
        repo_root: &Path,
        update_expected: bool,
    ) -> Result<CaseResult, CaseExecutionError> {
        self(profile, repo_root, update_expected)
    }
}
