// crates/survey-form-core/src/lib.rs
// ============================================================================
// Module: Survey Form Core Library
// Description: Public API surface for the survey form core.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Survey form core holds the validation schema shared by client and server,
//! the storage and rate limiting seams, and the transport-free submission
//! pipeline. HTTP, configuration, and durable storage live in sibling crates.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::RateLimiter;
pub use interfaces::StoreError;
pub use interfaces::SurveyStore;
pub use runtime::FixedWindowRateLimiter;
pub use runtime::InMemorySurveyStore;
pub use runtime::RateLimitPolicy;
pub use runtime::SharedRateLimiter;
pub use runtime::SharedSurveyStore;
pub use runtime::SubmissionError;
pub use runtime::SubmissionReceipt;
pub use runtime::SubmissionService;
