// crates/quality-gate-config/src/config.rs
// ============================================================================
// Module: Quality Gate Configuration
// Description: Configuration loading and validation for Quality Gate.
// Purpose: Provide strict config parsing with hard limits and built-in defaults.
// Dependencies: quality-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is read from an optional TOML file. An explicitly named file
//! must exist; the default `quality-gate.toml` is only used when present.
//! Unknown keys, oversized files, and invalid values fail the load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use quality_gate_core::DEFAULT_INDEX_FILE;
use quality_gate_core::DEFAULT_PROFILES_DIR;
use quality_gate_core::DEFAULT_RESULTS_PATH;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::env::ConfigEnv;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "quality-gate.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of runner command arguments, program included.
pub(crate) const MAX_RUNNER_ARGS: usize = 64;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Top-level Quality Gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityGateConfig {
    /// Index verification settings.
    #[serde(default)]
    pub verify: VerifyConfig,
    /// Profile harness settings.
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Run event settings.
    #[serde(default)]
    pub events: EventsConfig,
}

/// Index verification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Index path relative to the verification root.
    #[serde(default)]
    pub index: Option<String>,
    /// Report format.
    #[serde(default)]
    pub format: Option<ReportFormat>,
}

/// Verification report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Plain-text count line and sections.
    #[default]
    Text,
    /// JSON-serialized report.
    Json,
}

/// Profile harness settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Profile directory relative to the repository root.
    #[serde(default)]
    pub profiles: Option<String>,
    /// Results document path relative to the repository root.
    #[serde(default)]
    pub out: Option<String>,
    /// External case runner command: program followed by its arguments.
    #[serde(default)]
    pub runner: Option<Vec<String>>,
}

/// Run event settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Event log target: `stderr`, `off`, or a file path.
    #[serde(default)]
    pub log: Option<String>,
}

impl QualityGateConfig {
    /// Loads configuration from `path`, `QUALITY_GATE_CONFIG`, or the default
    /// file name.
    ///
    /// A missing default file yields the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicit file is missing, the file
    /// cannot be read or parsed, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(&resolved)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", resolved.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.verify.validate()?;
        self.harness.validate()?;
        self.events.validate()
    }
}

impl VerifyConfig {
    /// Returns the configured index path or the built-in default.
    #[must_use]
    pub fn index_or_default(&self) -> &str {
        self.index.as_deref().unwrap_or(DEFAULT_INDEX_FILE)
    }

    /// Validates verification settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = &self.index {
            validate_path_string("verify.index", index)?;
        }
        Ok(())
    }
}

impl HarnessConfig {
    /// Returns the configured profile directory or the built-in default.
    #[must_use]
    pub fn profiles_or_default(&self) -> &str {
        self.profiles.as_deref().unwrap_or(DEFAULT_PROFILES_DIR)
    }

    /// Returns the configured results path or the built-in default.
    #[must_use]
    pub fn out_or_default(&self) -> &str {
        self.out.as_deref().unwrap_or(DEFAULT_RESULTS_PATH)
    }

    /// Validates harness settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(profiles) = &self.profiles {
            validate_path_string("harness.profiles", profiles)?;
        }
        if let Some(out) = &self.out {
            validate_path_string("harness.out", out)?;
        }
        if let Some(runner) = &self.runner {
            validate_runner(runner)?;
        }
        Ok(())
    }
}

impl EventsConfig {
    /// Validates event settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(log) = &self.log {
            validate_path_string("events.log", log)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment, flagging explicit paths.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) =
        read_env_nonempty(ConfigEnv::ConfigPath.as_str()).map_err(ConfigError::Invalid)?
    {
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against emptiness and length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the external runner command line.
fn validate_runner(runner: &[String]) -> Result<(), ConfigError> {
    let Some(program) = runner.first() else {
        return Err(ConfigError::Invalid("harness.runner must name a program".to_string()));
    };
    if program.trim().is_empty() {
        return Err(ConfigError::Invalid("harness.runner program must be non-empty".to_string()));
    }
    if runner.len() > MAX_RUNNER_ARGS {
        return Err(ConfigError::Invalid(format!(
            "harness.runner exceeds {MAX_RUNNER_ARGS} arguments"
        )));
    }
    Ok(())
}
