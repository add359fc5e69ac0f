// crates/quality-gate-core/src/lib.rs
// ============================================================================
// Module: Quality Gate Core Library
// Description: Public API surface for the Quality Gate core.
// Purpose: Expose file index verification and profile harness aggregation.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Quality Gate core holds the two checks used to gate a repository in CI:
//! verifying files against a recorded digest index, and running declarative
//! test profiles through a pluggable case runner into an aggregated results
//! document. Both report every finding in a stable order and never retry.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileEventSink;
pub use audit::MemoryEventSink;
pub use audit::NoopEventSink;
pub use audit::RunEvent;
pub use audit::RunEventKind;
pub use audit::RunEventSink;
pub use audit::StderrEventSink;
pub use interfaces::CaseExecutionError;
pub use interfaces::CaseRunner;
pub use runtime::Harness;
pub use runtime::HarnessError;
pub use runtime::HarnessOutcome;
pub use runtime::HarnessRequest;
pub use runtime::IndexVerifier;
pub use runtime::VerificationOutcome;
pub use runtime::VerificationReport;
pub use runtime::VerificationStatus;
pub use runtime::VerifyError;
