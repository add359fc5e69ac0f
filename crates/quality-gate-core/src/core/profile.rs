// crates/quality-gate-core/src/core/profile.rs
// ============================================================================
// Module: Quality Gate Test Profiles
// Description: Loosely-typed test profile documents and their discovery.
// Purpose: Load every profile in a directory in deterministic filename order.
// Dependencies: serde_json, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! A profile is a YAML mapping with one required field, `profile_id`. The rest
//! of the document is opaque to this crate and handed to the case runner
//! verbatim, in source key order.
//!
//! ## Invariants
//! - Discovery order is the lexicographic order of file names.
//! - Any unreadable or malformed profile fails the whole load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default profile directory, resolved relative to the repository root.
pub const DEFAULT_PROFILES_DIR: &str = "tests/profiles";
/// Required identifier field of every profile.
pub const PROFILE_ID_FIELD: &str = "profile_id";
/// File extensions recognized as profile documents.
const PROFILE_EXTENSIONS: &[&str] = &["yaml", "yml"];

// ============================================================================
// SECTION: Types
// ============================================================================

/// A parsed test profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Profile identifier taken from the `profile_id` field.
    pub profile_id: String,
    /// File the profile was read from.
    pub source: PathBuf,
    /// Full profile document, including `profile_id`, in source order.
    pub document: Map<String, Value>,
}

impl Profile {
    /// Builds a profile from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileLoadError`] when the document is not a mapping or has
    /// no non-empty string `profile_id`.
    pub fn from_document(source: PathBuf, document: Value) -> Result<Self, ProfileLoadError> {
        let Value::Object(document) = document else {
            return Err(ProfileLoadError::NotAMapping {
                path: source,
            });
        };
        let profile_id = match document.get(PROFILE_ID_FIELD) {
            Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
            _ => {
                return Err(ProfileLoadError::MissingProfileId {
                    path: source,
                });
            }
        };
        Ok(Self {
            profile_id,
            source,
            document,
        })
    }

    /// Returns the file name of the profile source, when it has one.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.source.file_name().and_then(OsStr::to_str)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Profile discovery and parsing errors. All of them are fatal to a run.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    /// The profile directory could not be listed.
    #[error("failed to read profile directory {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    Read {
        /// Profile file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A profile file is not valid YAML.
    #[error("failed to parse profile {path}: {source}")]
    Parse {
        /// Profile file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
    /// The profile document is not a mapping.
    #[error("profile {path} must be a mapping")]
    NotAMapping {
        /// Profile file path.
        path: PathBuf,
    },
    /// The profile has no usable `profile_id`.
    #[error("profile {path} is missing a non-empty string profile_id")]
    MissingProfileId {
        /// Profile file path.
        path: PathBuf,
    },
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Lists profile files in `directory`, sorted by file name.
///
/// Only regular files with a `.yaml` or `.yml` extension are returned.
/// Hidden files (names starting with `.`) are skipped and nested
/// directories are not searched.
///
/// # Errors
///
/// Returns [`ProfileLoadError::DirectoryUnreadable`] when the directory or one
/// of its entries cannot be read.
pub fn list_profile_files(directory: &Path) -> Result<Vec<PathBuf>, ProfileLoadError> {
    let unreadable = |source| ProfileLoadError::DirectoryUnreadable {
        path: directory.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(directory).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && !is_hidden(&path) && has_profile_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
    Ok(files)
}

/// Reads and parses one profile file.
///
/// # Errors
///
/// Returns [`ProfileLoadError`] when the file cannot be read or parsed.
pub fn load_profile(path: &Path) -> Result<Profile, ProfileLoadError> {
    let bytes = fs::read(path).map_err(|source| ProfileLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value =
        serde_yaml::from_slice(&bytes).map_err(|source| ProfileLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Profile::from_document(path.to_path_buf(), document)
}

/// Discovers and parses every profile in `directory`, ordered by file name.
///
/// Profiles are re-read on every call.
///
/// # Errors
///
/// Returns the first [`ProfileLoadError`] encountered; no partial list is
/// produced.
pub fn discover_profiles(directory: &Path) -> Result<Vec<Profile>, ProfileLoadError> {
    list_profile_files(directory)?.iter().map(|path| load_profile(path)).collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `path` carries a profile document extension.
fn has_profile_extension(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str).is_some_and(|ext| PROFILE_EXTENSIONS.contains(&ext))
}

/// Returns true when the file name of `path` starts with a dot.
fn is_hidden(path: &Path) -> bool {
    path.file_name().and_then(OsStr::to_str).is_some_and(|name| name.starts_with('.'))
}
