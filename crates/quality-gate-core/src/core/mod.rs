// crates/quality-gate-core/src/core/mod.rs
// ============================================================================
// Module: Quality Gate Core Types
// Description: Index entries, digests, profiles, and case results.
// Purpose: Provide the data model shared by the verifier and the harness.
// Dependencies: serde, serde_json, serde_yaml, sha2
// ============================================================================

//! ## Overview
//! Core types are created fresh for each run and are read-only once built.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod hashing;
pub mod index;
pub mod profile;
pub mod results;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use index::DEFAULT_INDEX_FILE;
pub use index::IndexEntry;
pub use index::IndexError;
pub use profile::DEFAULT_PROFILES_DIR;
pub use profile::Profile;
pub use profile::ProfileLoadError;
pub use results::CaseResult;
pub use results::CaseResultError;
pub use results::DEFAULT_EXPECTED_STATUS;
pub use results::DEFAULT_RESULTS_PATH;
pub use results::PersistError;
pub use results::Summary;
pub use results::SummaryEntry;
pub use results::persist_results;
pub use results::summarize;
pub use results::to_pretty_json;
