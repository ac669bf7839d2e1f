// crates/survey-form-cli/src/lib.rs
// ============================================================================
// Module: Survey Form CLI Library
// Description: Shared helpers for the survey form command-line interface.
// Purpose: Provide i18n, bind policy, and the form client to the binary and tests.
// Dependencies: survey-form-core, survey-form-config, reqwest
// ============================================================================

//! ## Overview
//! Shared CLI utilities: the internationalized message catalog, the
//! loopback-first serve policy, and the HTTP form client. The binary entry
//! point (`src/main.rs`) imports these helpers so all user-facing output goes
//! through one catalog.
//!
//! Security posture: CLI inputs and server responses are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// HTTP client for the form endpoint.
pub mod form_client;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Bind safety policy for `serve`.
pub mod serve_policy;

#[cfg(test)]
mod tests;
