// crates/quality-gate-core/src/runtime/harness.rs
// ============================================================================
// Module: Quality Gate Profile Harness
// Description: Discovers profiles, runs each case, and aggregates results.
// Purpose: Produce the persisted results document and the status summary.
// Dependencies: crate::{audit, core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! A harness run is strictly sequential: discover profiles in filename order,
//! run each one through the injected [`CaseRunner`], write the full results
//! document, then derive the summary. Any failure before the document is
//! written aborts the run and leaves no results document behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

use crate::audit::RunEvent;
use crate::audit::RunEventKind;
use crate::audit::RunEventSink;
use crate::core::CaseResult;
use crate::core::PersistError;
use crate::core::Profile;
use crate::core::ProfileLoadError;
use crate::core::Summary;
use crate::core::profile::discover_profiles;
use crate::core::results::persist_results;
use crate::core::results::summarize;
use crate::interfaces::CaseExecutionError;
use crate::interfaces::CaseRunner;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inputs for one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessRequest {
    /// Repository root handed to the case runner.
    pub repo_root: PathBuf,
    /// Directory holding the profile documents.
    pub profiles_dir: PathBuf,
    /// Path the results document is written to.
    pub out_path: PathBuf,
    /// Pass-through flag for the case runner.
    pub update_expected: bool,
}

/// Products of a completed harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessOutcome {
    /// Results in profile discovery order, as persisted.
    pub results: Vec<CaseResult>,
    /// Summary derived from the results.
    pub summary: Summary,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal harness errors.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Profile discovery or parsing failed.
    #[error(transparent)]
    ProfileLoad(#[from] ProfileLoadError),
    /// The case runner failed.
    #[error(transparent)]
    CaseExecution(#[from] CaseExecutionError),
    /// The runner returned a result for a different profile.
    #[error("profile {path} has id {expected} but its result reports {actual}")]
    ProfileIdMismatch {
        /// Profile source file.
        path: PathBuf,
        /// Identifier from the profile.
        expected: String,
        /// Identifier from the result's `meta.profile_id`.
        actual: String,
    },
    /// The results document could not be written.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Sequential profile harness.
pub struct Harness<'a> {
    /// Collaborator that executes each profile.
    runner: &'a dyn CaseRunner,
    /// Destination for run events.
    events: &'a dyn RunEventSink,
}

impl<'a> Harness<'a> {
    /// Creates a harness around `runner`.
    #[must_use]
    pub const fn new(runner: &'a dyn CaseRunner, events: &'a dyn RunEventSink) -> Self {
        Self {
            runner,
            events,
        }
    }

    /// Executes a full run: discover, run, persist, summarize.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when discovery, a case, or persistence fails.
    pub fn run(&self, request: &HarnessRequest) -> Result<HarnessOutcome, HarnessError> {
        let profiles = discover_profiles(&request.profiles_dir)?;
        self.events.record(&RunEvent::now(RunEventKind::ProfilesDiscovered {
            directory: request.profiles_dir.display().to_string(),
            count: profiles.len(),
        }));

        let results = self.run_cases(&profiles, &request.repo_root, request.update_expected)?;

        persist_results(&results, &request.out_path)?;
        self.events.record(&RunEvent::now(RunEventKind::ResultsPersisted {
            path: request.out_path.display().to_string(),
            results: results.len(),
        }));

        let summary = summarize(&results);
        self.events.record(&RunEvent::now(RunEventKind::HarnessFinished {
            cases: results.len(),
            summarized: summary.len(),
        }));
        Ok(HarnessOutcome {
            results,
            summary,
        })
    }

    /// Runs every profile in order and checks each result's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::CaseExecution`] for the first failing case and
    /// [`HarnessError::ProfileIdMismatch`] when a result names another profile.
    pub fn run_cases(
        &self,
        profiles: &[Profile],
        repo_root: &Path,
        update_expected: bool,
    ) -> Result<Vec<CaseResult>, HarnessError> {
        let mut results = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let result = self.runner.run(profile, repo_root, update_expected)?;
            if result.profile_id() != profile.profile_id {
                return Err(HarnessError::ProfileIdMismatch {
                    path: profile.source.clone(),
                    expected: profile.profile_id.clone(),
                    actual: result.profile_id().to_string(),
                });
            }
            self.events.record(&RunEvent::now(RunEventKind::CaseCompleted {
                profile_id: result.profile_id().to_string(),
                expected_status: result.effective_status().to_string(),
            }));
            results.push(result);
        }
        Ok(results)
    }
}
