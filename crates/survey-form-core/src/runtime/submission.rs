// crates/survey-form-core/src/runtime/submission.rs
// ============================================================================
// Module: Survey Submission Service
// Description: Transport-free submission pipeline.
// Purpose: Apply rate limiting, validation, and persistence in a fixed order.
// Dependencies: crate::core, crate::interfaces, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`SubmissionService`] owns the control flow of one submission:
//! rate-limit check, JSON parsing, schema validation, then a single store
//! write. It knows nothing about HTTP; transports resolve the client
//! identifier and map [`SubmissionError`] to their own status codes.
//!
//! The limiter is consulted before the body is inspected, so a limited
//! client is rejected regardless of payload validity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::FieldErrors;
use crate::core::ResponseId;
use crate::core::SurveyResponse;
use crate::core::validate_submission;
use crate::interfaces::RateLimiter;
use crate::interfaces::StoreError;
use crate::interfaces::SurveyStore;
use crate::runtime::rate_limit::SharedRateLimiter;
use crate::runtime::store::SharedSurveyStore;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Submission pipeline failures.
///
/// # Invariants
/// - Messages never embed submitted field values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The client exceeded its request allowance.
    #[error("rate limited")]
    RateLimited,
    /// The payload violated one or more schema rules.
    #[error("invalid submission: {0}")]
    Validation(FieldErrors),
    /// The body could not be read or was not valid JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// The body exceeded the configured size limit.
    #[error("request body exceeds {max_bytes} bytes")]
    PayloadTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
    },
    /// The store rejected the write.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl SubmissionError {
    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Validation(_) => "validation",
            Self::MalformedBody(_) => "malformed_body",
            Self::PayloadTooLarge {
                ..
            } => "payload_too_large",
            Self::Storage(_) => "storage",
        }
    }

    /// Returns true for failures caused by the request payload.
    #[must_use]
    pub const fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::MalformedBody(_)
                | Self::PayloadTooLarge {
                    ..
                }
        )
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Result of a persisted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Store-assigned identifier.
    pub response_id: ResponseId,
    /// Normalized response that was stored.
    pub response: SurveyResponse,
}

/// Submission pipeline over injected store and limiter.
///
/// # Invariants
/// - At most one store write per accepted submission.
/// - Nothing is written when rate limiting or validation fails.
#[derive(Clone)]
pub struct SubmissionService {
    /// Response store.
    store: SharedSurveyStore,
    /// Per-client limiter.
    limiter: SharedRateLimiter,
}

impl SubmissionService {
    /// Creates a service over the given collaborators.
    #[must_use]
    pub const fn new(store: SharedSurveyStore, limiter: SharedRateLimiter) -> Self {
        Self {
            store,
            limiter,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &SharedSurveyStore {
        &self.store
    }

    /// Records a request from `identifier` against the rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::RateLimited`] when the allowance is spent.
    pub fn admit(&self, identifier: &str) -> Result<(), SubmissionError> {
        if self.limiter.is_limited(identifier) {
            return Err(SubmissionError::RateLimited);
        }
        Ok(())
    }

    /// Parses, validates, and persists an admitted request body.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError`] when the body is malformed, fails the
    /// schema, or cannot be stored.
    pub fn process(&self, body: &[u8]) -> Result<SubmissionReceipt, SubmissionError> {
        let candidate: Value = serde_json::from_slice(body)
            .map_err(|err| SubmissionError::MalformedBody(err.to_string()))?;
        let response = validate_submission(&candidate).map_err(SubmissionError::Validation)?;
        let response_id = self.store.create(&response)?;
        Ok(SubmissionReceipt {
            response_id,
            response,
        })
    }

    /// Runs the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError`] from [`Self::admit`] or [`Self::process`].
    pub fn submit(
        &self,
        identifier: &str,
        body: &[u8],
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.admit(identifier)?;
        self.process(body)
    }
}
