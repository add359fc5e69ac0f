// crates/quality-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Provides message catalog and translation utilities for the CLI.
// Purpose: Centralize user-facing strings for future localization support.
// Dependencies: Standard library collections and formatting utilities.
// ============================================================================

//! ## Overview
//! The Quality Gate CLI stores user-facing strings in a small translation
//! catalog to keep messaging consistent. All runtime output should be routed
//! through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself to avoid panics.
//! - The `INDEX_*` and `TARGET_*` diagnostics are machine-matched tokens and
//!   must not be reworded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries loaded into the localized message bundle.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "quality-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("env.load_failed", "Invalid environment: {error}"),
    ("events.target_invalid", "Invalid event log target: {error}"),
    ("events.open_failed", "Failed to open event log {path}: {error}"),
    ("root.resolve_failed", "Failed to resolve root {path}: {error}"),
    ("verify.index_missing", "INDEX_MISSING: {path}"),
    ("verify.index_line_invalid", "INDEX_LINE_INVALID: {line}"),
    ("verify.index_unreadable", "INDEX_UNREADABLE: {path}: {error}"),
    ("verify.target_unreadable", "TARGET_UNREADABLE: {path}: {error}"),
    ("verify.render_failed", "Failed to render verification report: {error}"),
    ("harness.failed", "Harness failed: {error}"),
    ("harness.summary_failed", "Failed to render summary: {error}"),
    ("runner.payload_failed", "Failed to encode profile {profile}: {error}"),
    ("runner.spawn_failed", "Failed to start runner {program}: {error}"),
    ("runner.stdin_failed", "Failed to send profile to runner {program}: {error}"),
    ("runner.wait_failed", "Failed to wait for runner {program}: {error}"),
    ("runner.exit_failed", "Runner {program} exited with {status}"),
    ("runner.output_invalid", "Runner {program} produced invalid output: {error}"),
    ("runner.writer_panicked", "Profile writer for runner {program} panicked"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the English fallback catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static English catalog used by the CLI.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
///
/// # Returns
///
/// A localized [`String`] with placeholders substituted.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

// ============================================================================
// SECTION: Tests
// ============================================================================
