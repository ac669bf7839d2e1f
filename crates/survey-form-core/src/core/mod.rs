// crates/survey-form-core/src/core/mod.rs
// ============================================================================
// Module: Survey Form Core Types
// Description: Data model and validation schema for survey responses.
// Purpose: Group the persisted entity with the rules that produce it.
// Dependencies: regex, serde, serde_json
// ============================================================================

//! ## Overview
//! Core types are transport-agnostic. The [`schema`] module is the only way
//! untrusted input becomes a [`SurveyResponse`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod response;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use response::ContactMethod;
pub use response::ResponseId;
pub use response::SurveyResponse;
pub use schema::FieldError;
pub use schema::FieldErrors;
pub use schema::FieldName;
pub use schema::validate_submission;
