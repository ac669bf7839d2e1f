// crates/survey-form-core/src/runtime/mod.rs
// ============================================================================
// Module: Survey Form Runtime
// Description: Runtime services for the survey submission pipeline.
// Purpose: Provide stores, limiters, and the submission service.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime components implement the interfaces and drive submissions end to
//! end without any transport concerns.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod rate_limit;
pub mod store;
pub mod submission;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use rate_limit::FixedWindowRateLimiter;
pub use rate_limit::RateLimitPolicy;
pub use rate_limit::SharedRateLimiter;
pub use store::InMemorySurveyStore;
pub use store::SharedSurveyStore;
pub use submission::SubmissionError;
pub use submission::SubmissionReceipt;
pub use submission::SubmissionService;
