// crates/quality-gate-config/src/lib.rs
// ============================================================================
// Module: Quality Gate Config Library
// Description: Configuration model, validation, and environment overrides.
// Purpose: Single source of truth for quality-gate.toml semantics.
// Dependencies: quality-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `quality-gate-config` defines the optional configuration file for both
//! checks, validates it strictly, and reads the environment overrides. CLI
//! flags take precedence over the environment, which takes precedence over
//! the file; built-in defaults apply last.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::ConfigEnv;
pub use env::EnvConfig;
pub use env::EventLogTarget;
