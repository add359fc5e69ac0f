// crates/quality-gate-core/src/core/results.rs
// ============================================================================
// Module: Quality Gate Case Results
// Description: Case results, the persisted results document, and summaries.
// Purpose: Aggregate per-profile outcomes into stable machine-readable output.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`CaseResult`] is the JSON object returned by a case runner. Only
//! `meta.profile_id` and the optional `expected_status` are interpreted; every
//! other field is carried through to the results document unchanged and in
//! its original order.
//!
//! ## Invariants
//! - The results document preserves profile discovery order.
//! - Summary keys keep first-seen order; a repeated `profile_id` takes the
//!   status of its last occurrence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default results document path, resolved relative to the repository root.
pub const DEFAULT_RESULTS_PATH: &str = "tests/results.json";
/// Status reported for a case that does not state one.
pub const DEFAULT_EXPECTED_STATUS: &str = "OK";
/// Top-level field holding case metadata.
const META_FIELD: &str = "meta";
/// Metadata field naming the profile a result belongs to.
const PROFILE_ID_FIELD: &str = "profile_id";
/// Top-level field holding the expected status.
const EXPECTED_STATUS_FIELD: &str = "expected_status";

// ============================================================================
// SECTION: Case Result
// ============================================================================

/// Result of running one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// Profile identifier from `meta.profile_id`.
    profile_id: String,
    /// Expected status when the result states one.
    expected_status: Option<String>,
    /// Full result object as produced by the runner.
    document: Map<String, Value>,
}

impl CaseResult {
    /// Creates a minimal result carrying only `meta.profile_id`.
    #[must_use]
    pub fn new(profile_id: impl Into<String>) -> Self {
        let profile_id = profile_id.into();
        let mut meta = Map::new();
        meta.insert(PROFILE_ID_FIELD.to_string(), Value::String(profile_id.clone()));
        let mut document = Map::new();
        document.insert(META_FIELD.to_string(), Value::Object(meta));
        Self {
            profile_id,
            expected_status: None,
            document,
        }
    }

    /// Sets `expected_status` on the result.
    #[must_use]
    pub fn with_expected_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.document.insert(EXPECTED_STATUS_FIELD.to_string(), Value::String(status.clone()));
        self.expected_status = Some(status);
        self
    }

    /// Sets an additional top-level field on the result.
    ///
    /// The interpreted fields `meta` and `expected_status` cannot be replaced
    /// through this method; use [`CaseResult::with_expected_status`] instead.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != META_FIELD && key != EXPECTED_STATUS_FIELD {
            self.document.insert(key, value);
        }
        self
    }

    /// Validates a runner-produced JSON value as a case result.
    ///
    /// A `null` `expected_status` is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`CaseResultError`] when the value is not an object, lacks a
    /// string `meta.profile_id`, or has a non-string `expected_status`.
    pub fn from_value(value: Value) -> Result<Self, CaseResultError> {
        let Value::Object(document) = value else {
            return Err(CaseResultError::NotAnObject);
        };
        let profile_id = document
            .get(META_FIELD)
            .and_then(Value::as_object)
            .and_then(|meta| meta.get(PROFILE_ID_FIELD))
            .and_then(Value::as_str)
            .ok_or(CaseResultError::MissingProfileId)?
            .to_string();
        let expected_status = match document.get(EXPECTED_STATUS_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(status)) => Some(status.clone()),
            Some(_) => return Err(CaseResultError::InvalidExpectedStatus),
        };
        Ok(Self {
            profile_id,
            expected_status,
            document,
        })
    }

    /// Returns `meta.profile_id`.
    #[must_use]
    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    /// Returns the stated expected status, if any.
    #[must_use]
    pub fn expected_status(&self) -> Option<&str> {
        self.expected_status.as_deref()
    }

    /// Returns the expected status, defaulting to [`DEFAULT_EXPECTED_STATUS`].
    #[must_use]
    pub fn effective_status(&self) -> &str {
        self.expected_status().unwrap_or(DEFAULT_EXPECTED_STATUS)
    }

    /// Returns the full result object.
    #[must_use]
    pub const fn document(&self) -> &Map<String, Value> {
        &self.document
    }
}

impl Serialize for CaseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

/// Case result validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseResultError {
    /// The runner output is not a JSON object.
    #[error("case result must be a json object")]
    NotAnObject,
    /// The runner output has no string `meta.profile_id`.
    #[error("case result is missing a string meta.profile_id")]
    MissingProfileId,
    /// The runner output has a non-string `expected_status`.
    #[error("case result expected_status must be a string")]
    InvalidExpectedStatus,
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// One summary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Profile identifier.
    pub profile_id: String,
    /// Expected status of the last result with this identifier.
    pub expected_status: String,
}

/// Mapping of profile identifier to expected status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Rows in first-seen order.
    entries: Vec<SummaryEntry>,
}

impl Summary {
    /// Returns the rows in first-seen order.
    #[must_use]
    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    /// Returns the status recorded for `profile_id`.
    #[must_use]
    pub fn get(&self, profile_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.profile_id == profile_id)
            .map(|entry| entry.expected_status.as_str())
    }

    /// Returns the number of distinct profile identifiers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no results were summarized.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a status, replacing the value of an existing identifier in place.
    fn record(&mut self, profile_id: &str, expected_status: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.profile_id == profile_id) {
            expected_status.clone_into(&mut entry.expected_status);
            return;
        }
        self.entries.push(SummaryEntry {
            profile_id: profile_id.to_string(),
            expected_status: expected_status.to_string(),
        });
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.profile_id, &entry.expected_status)?;
        }
        map.end()
    }
}

/// Derives the summary from results in discovery order.
#[must_use]
pub fn summarize(results: &[CaseResult]) -> Summary {
    let mut summary = Summary::default();
    for result in results {
        summary.record(result.profile_id(), result.effective_status());
    }
    summary
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

/// Errors raised while writing the results document.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The parent directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The results could not be serialized.
    #[error("failed to serialize results for {path}: {source}")]
    Serialize {
        /// Output path.
        path: PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Renders a value as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Writes the full results document to `out_path` as pretty JSON.
///
/// Missing parent directories are created first. The output handle is closed
/// before returning, on success and on failure alike.
///
/// # Errors
///
/// Returns [`PersistError`] when the directory cannot be created or the
/// document cannot be serialized or written.
pub fn persist_results(results: &[CaseResult], out_path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = out_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let write_error = |source| PersistError::Write {
        path: out_path.to_path_buf(),
        source,
    };
    let file = File::create(out_path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results).map_err(|source| {
        if source.is_io() {
            PersistError::Write {
                path: out_path.to_path_buf(),
                source: io::Error::from(source),
            }
        } else {
            PersistError::Serialize {
                path: out_path.to_path_buf(),
                source,
            }
        }
    })?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)?;
    Ok(())
}
