// crates/quality-gate-core/src/runtime/verifier.rs
// ============================================================================
// Module: Quality Gate Index Verifier
// Description: Verifies files on disk against a recorded digest index.
// Purpose: Classify every index entry and aggregate an exhaustive report.
// Dependencies: crate::{audit, core}, serde, thiserror
// ============================================================================

//! ## Overview
//! The verifier reads and parses the whole index before touching any target
//! file, then classifies each entry in index order as ok, missing, or
//! mismatched. Findings never stop the run; only an absent, unreadable, or
//! malformed index (or an unreadable target) aborts it, and an aborted run
//! produces no report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::audit::NoopEventSink;
use crate::audit::RunEvent;
use crate::audit::RunEventKind;
use crate::audit::RunEventSink;
use crate::core::hashing::DEFAULT_HASH_ALGORITHM;
use crate::core::hashing::HashAlgorithm;
use crate::core::hashing::HashError;
use crate::core::hashing::hash_file;
use crate::core::index::IndexEntry;
use crate::core::index::IndexError;
use crate::core::index::parse_index;

// ============================================================================
// SECTION: Verification Types
// ============================================================================

/// Classification of a single index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The file exists and its digest matches.
    Ok,
    /// The file does not exist under the root.
    Missing,
    /// The file exists but its digest differs.
    Mismatch {
        /// Digest recorded in the index, as written.
        expected: String,
        /// Digest computed from the file, lowercase.
        actual: String,
    },
}

impl VerificationOutcome {
    /// Returns the outcome label used in run events.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Missing => "missing",
            Self::Mismatch {
                ..
            } => "mismatch",
        }
    }
}

/// Overall verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Every entry matched.
    Pass,
    /// At least one entry was missing or mismatched.
    Fail,
}

/// Per-class entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerificationCounts {
    /// Entries whose digest matched.
    pub ok: usize,
    /// Entries whose file was absent.
    pub missing: usize,
    /// Entries whose digest differed.
    pub mismatch: usize,
}

/// A mismatched entry with both digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchEntry {
    /// Entry path relative to the root.
    pub path: String,
    /// Digest recorded in the index, as written.
    pub expected: String,
    /// Digest computed from the file.
    pub actual: String,
}

/// Verification report for one index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Per-class counts; they sum to the number of parsed entries.
    counts: VerificationCounts,
    /// Missing paths in index order.
    missing: Vec<String>,
    /// Mismatched entries in index order.
    mismatches: Vec<MismatchEntry>,
}

impl VerificationReport {
    /// Returns the per-class counts.
    #[must_use]
    pub const fn counts(&self) -> VerificationCounts {
        self.counts
    }

    /// Returns missing paths in index order.
    #[must_use]
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Returns mismatched entries in index order.
    #[must_use]
    pub fn mismatches(&self) -> &[MismatchEntry] {
        &self.mismatches
    }

    /// Returns the number of entries covered by the report.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.counts.ok + self.counts.missing + self.counts.mismatch
    }

    /// Returns [`VerificationStatus::Pass`] iff nothing is missing or mismatched.
    #[must_use]
    pub const fn status(&self) -> VerificationStatus {
        if self.counts.missing == 0 && self.counts.mismatch == 0 {
            VerificationStatus::Pass
        } else {
            VerificationStatus::Fail
        }
    }

    /// Renders the plain-text report.
    ///
    /// The count line is always present; the `[MISSING]` and `[MISMATCH]`
    /// sections appear only when non-empty, each preceded by a blank line.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "OK={}  MISSING={}  MISMATCH={}",
            self.counts.ok, self.counts.missing, self.counts.mismatch
        )];
        if !self.missing.is_empty() {
            lines.push(String::new());
            lines.push("[MISSING]".to_string());
            lines.extend(self.missing.iter().cloned());
        }
        if !self.mismatches.is_empty() {
            lines.push(String::new());
            lines.push("[MISMATCH]".to_string());
            for entry in &self.mismatches {
                lines.push(entry.path.clone());
                lines.push(format!("  expected={}", entry.expected));
                lines.push(format!("  got     ={}", entry.actual));
            }
        }
        lines.join("\n")
    }

    /// Adds one classified entry.
    fn record(&mut self, entry: &IndexEntry, outcome: VerificationOutcome) {
        match outcome {
            VerificationOutcome::Ok => self.counts.ok += 1,
            VerificationOutcome::Missing => {
                self.counts.missing += 1;
                self.missing.push(entry.relative_path.clone());
            }
            VerificationOutcome::Mismatch {
                expected,
                actual,
            } => {
                self.counts.mismatch += 1;
                self.mismatches.push(MismatchEntry {
                    path: entry.relative_path.clone(),
                    expected,
                    actual,
                });
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal verification errors. None of them yields a partial report.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The index file does not exist.
    #[error("index file not found: {path}")]
    IndexMissing {
        /// Resolved index path.
        path: PathBuf,
    },
    /// The index file exists but cannot be read as UTF-8 text.
    #[error("failed to read index {path}: {source}")]
    IndexUnreadable {
        /// Resolved index path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An index line is malformed.
    #[error(transparent)]
    IndexLineInvalid(#[from] IndexError),
    /// A target file exists but cannot be hashed.
    #[error(transparent)]
    TargetUnreadable(#[from] HashError),
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Verifies files under a root against a digest index.
pub struct IndexVerifier<'a> {
    /// Hash algorithm used for verification.
    hash_algorithm: HashAlgorithm,
    /// Destination for run events.
    events: &'a dyn RunEventSink,
}

impl<'a> IndexVerifier<'a> {
    /// Creates a verifier that reports progress to `events`.
    #[must_use]
    pub const fn new(hash_algorithm: HashAlgorithm, events: &'a dyn RunEventSink) -> Self {
        Self {
            hash_algorithm,
            events,
        }
    }

    /// Verifies every entry of the index at `index_path` (relative to `root`
    /// unless absolute).
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError`] for an absent, unreadable, or malformed index
    /// and for a target that exists but cannot be read.
    pub fn verify(&self, root: &Path, index_path: &Path) -> Result<VerificationReport, VerifyError> {
        let index_path = root.join(index_path);
        self.events.record(&RunEvent::now(RunEventKind::VerifyStarted {
            root: root.display().to_string(),
            index: index_path.display().to_string(),
        }));
        let entries = read_index(&index_path)?;
        self.events.record(&RunEvent::now(RunEventKind::IndexParsed {
            entries: entries.len(),
        }));

        let mut report = VerificationReport::default();
        for entry in &entries {
            let outcome = self.check_entry(root, entry)?;
            self.events.record(&RunEvent::now(RunEventKind::EntryChecked {
                path: entry.relative_path.clone(),
                outcome: outcome.label(),
            }));
            report.record(entry, outcome);
        }

        let counts = report.counts();
        self.events.record(&RunEvent::now(RunEventKind::VerifyFinished {
            ok: counts.ok,
            missing: counts.missing,
            mismatch: counts.mismatch,
        }));
        Ok(report)
    }

    /// Classifies a single entry against the file at `root/relative_path`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::TargetUnreadable`] when the file exists but
    /// cannot be hashed.
    pub fn check_entry(
        &self,
        root: &Path,
        entry: &IndexEntry,
    ) -> Result<VerificationOutcome, VerifyError> {
        let target = root.join(&entry.relative_path);
        if !target.exists() {
            return Ok(VerificationOutcome::Missing);
        }
        let actual = hash_file(self.hash_algorithm, &target)?;
        if actual.matches(&entry.expected_hash) {
            Ok(VerificationOutcome::Ok)
        } else {
            Ok(VerificationOutcome::Mismatch {
                expected: entry.expected_hash.clone(),
                actual: actual.value,
            })
        }
    }
}

/// Verifies an index with the default algorithm and no run events.
///
/// # Errors
///
/// Returns [`VerifyError`] under the same conditions as
/// [`IndexVerifier::verify`].
pub fn verify_index(root: &Path, index_path: &Path) -> Result<VerificationReport, VerifyError> {
    IndexVerifier::new(DEFAULT_HASH_ALGORITHM, &NoopEventSink).verify(root, index_path)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads and parses the index, failing before any target is touched.
fn read_index(index_path: &Path) -> Result<Vec<IndexEntry>, VerifyError> {
    if !index_path.exists() {
        return Err(VerifyError::IndexMissing {
            path: index_path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(index_path).map_err(|source| VerifyError::IndexUnreadable {
        path: index_path.to_path_buf(),
        source,
    })?;
    Ok(parse_index(&text)?)
}
