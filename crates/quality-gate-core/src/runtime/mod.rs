// crates/quality-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Quality Gate Runtime
// Description: Index verifier and profile harness pipelines.
// Purpose: Run the enumerate, classify, aggregate, report flow for both checks.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Both pipelines are synchronous and single-threaded. Each call is a pure
//! function of its inputs plus the artifacts it writes; nothing is cached
//! between calls.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod harness;
pub mod verifier;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use harness::Harness;
pub use harness::HarnessError;
pub use harness::HarnessOutcome;
pub use harness::HarnessRequest;
pub use verifier::IndexVerifier;
pub use verifier::MismatchEntry;
pub use verifier::VerificationCounts;
pub use verifier::VerificationOutcome;
pub use verifier::VerificationReport;
pub use verifier::VerificationStatus;
pub use verifier::VerifyError;
pub use verifier::verify_index;
