// crates/quality-gate-cli/src/lib.rs
// ============================================================================
// Module: Quality Gate CLI Library
// Description: Shared helpers for the Quality Gate command-line interface.
// Purpose: Provide the message catalog and built-in case runners.
// Dependencies: quality-gate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This library houses the CLI message catalog and the case runners the
//! binary can plug into the harness. The binary entry point (`src/main.rs`)
//! imports these helpers to keep all user-facing output consistent.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Built-in case runners.
pub mod runner;
