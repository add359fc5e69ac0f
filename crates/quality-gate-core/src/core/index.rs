// crates/quality-gate-core/src/core/index.rs
// ============================================================================
// Module: Quality Gate File Index
// Description: Parser for `<hex-digest> <relative-path>` index manifests.
// Purpose: Turn index text into ordered entries for verification.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An index file holds one record per non-blank line: a hex digest, then
//! whitespace, then a path relative to the verification root. Paths may
//! contain inner whitespace; only the surrounding whitespace is dropped.
//! Duplicate paths are kept and verified independently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default index file name, resolved relative to the verification root.
pub const DEFAULT_INDEX_FILE: &str = "FILE_INDEX_SHA256.txt";

// ============================================================================
// SECTION: Types
// ============================================================================

/// One parsed index record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Recorded hex digest, as written in the index.
    pub expected_hash: String,
    /// Path relative to the verification root.
    pub relative_path: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Index parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A non-blank line did not hold both a digest and a path.
    #[error("invalid index line {line_number}: {line}")]
    LineInvalid {
        /// One-based line number within the index file.
        line_number: usize,
        /// Trimmed line content.
        line: String,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a single index line.
///
/// Returns `Ok(None)` for blank lines, which are not entries.
///
/// # Errors
///
/// Returns [`IndexError::LineInvalid`] when the line does not split into a
/// digest token and a non-empty path.
pub fn parse_line(line_number: usize, line: &str) -> Result<Option<IndexEntry>, IndexError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let invalid = || IndexError::LineInvalid {
        line_number,
        line: trimmed.to_string(),
    };
    let (hash, rest) = trimmed.split_once(char::is_whitespace).ok_or_else(invalid)?;
    let relative_path = rest.trim();
    if relative_path.is_empty() {
        return Err(invalid());
    }
    Ok(Some(IndexEntry {
        expected_hash: hash.to_string(),
        relative_path: relative_path.to_string(),
    }))
}

/// Parses a whole index document in file order.
///
/// Parsing stops at the first invalid line; no partial entry list is returned.
///
/// # Errors
///
/// Returns [`IndexError::LineInvalid`] for the first malformed line.
pub fn parse_index(text: &str) -> Result<Vec<IndexEntry>, IndexError> {
    let mut entries = Vec::new();
    for (offset, line) in text.lines().enumerate() {
        if let Some(entry) = parse_line(offset + 1, line)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}
