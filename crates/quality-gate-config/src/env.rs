// crates/quality-gate-config/src/env.rs
// ============================================================================
// Module: Quality Gate Environment
// Description: Environment-backed overrides for Quality Gate.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 or an empty value fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys read by Quality Gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    /// Optional configuration file path.
    ConfigPath,
    /// Optional run event log target (`stderr`, `off`, or a file path).
    EventLog,
}

impl ConfigEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "QUALITY_GATE_CONFIG",
            Self::EventLog => "QUALITY_GATE_EVENT_LOG",
        }
    }
}

// ============================================================================
// SECTION: Event Log Target
// ============================================================================

/// Destination for run events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventLogTarget {
    /// Events are discarded.
    #[default]
    Off,
    /// Events are written to stderr as JSON lines.
    Stderr,
    /// Events are appended to a file as JSON lines.
    File(PathBuf),
}

impl EventLogTarget {
    /// Parses a target: `stderr`, `off`, or anything else as a file path.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is empty.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        match trimmed {
            "" => Err("event log target must not be empty".to_string()),
            "stderr" => Ok(Self::Stderr),
            "off" => Ok(Self::Off),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed overrides derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvConfig {
    /// Optional configuration file path.
    pub config_path: Option<PathBuf>,
    /// Optional event log target.
    pub event_log: Option<EventLogTarget>,
}

impl EnvConfig {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8 or is
    /// empty.
    pub fn load() -> Result<Self, String> {
        let config_path = read_env_nonempty(ConfigEnv::ConfigPath.as_str())?.map(PathBuf::from);
        let event_log = read_env_nonempty(ConfigEnv::EventLog.as_str())?
            .map(|value| EventLogTarget::parse(&value))
            .transpose()?;
        Ok(Self {
            config_path,
            event_log,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub(crate) fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}
