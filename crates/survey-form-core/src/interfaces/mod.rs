// crates/survey-form-core/src/interfaces/mod.rs
// ============================================================================
// Module: Survey Form Interfaces
// Description: Backend-agnostic seams for storage and rate limiting.
// Purpose: Let the submission pipeline run against injected collaborators.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The submission pipeline depends only on these traits. Servers wire in a
//! concrete store (in-memory or `SQLite`) and a rate limiter at startup, and
//! tests can substitute deterministic fakes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ResponseId;
use crate::core::SurveyResponse;

// ============================================================================
// SECTION: Survey Store
// ============================================================================

/// Survey store errors.
///
/// # Invariants
/// - Messages never embed submitted field values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store I/O error.
    #[error("survey store io error: {0}")]
    Io(String),
    /// Store data version is incompatible.
    #[error("survey store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("survey store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("survey store error: {0}")]
    Store(String),
}

/// Append-only persistence for validated survey responses.
pub trait SurveyStore {
    /// Persists one response and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the record cannot be written. No partial
    /// record is left behind on failure.
    fn create(&self, response: &SurveyResponse) -> Result<ResponseId, StoreError>;

    /// Reports store readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is not ready.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Rate Limiter
// ============================================================================

/// Per-client request limiter.
pub trait RateLimiter {
    /// Records a request from `identifier` and reports whether it exceeds
    /// the configured allowance.
    fn is_limited(&self, identifier: &str) -> bool;
}
