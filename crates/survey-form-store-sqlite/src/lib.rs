// crates/survey-form-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Survey Store
// Description: Durable SurveyStore backend using SQLite.
// Purpose: Provide production persistence for survey responses.
// Dependencies: survey-form-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`SurveyStore`] implementation that
//! appends one row per accepted submission. The schema is versioned through
//! a `store_meta` table and unknown versions fail closed.
//!
//! [`SurveyStore`]: survey_form_core::SurveyStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSurveyStore;
pub use store::SqliteSyncMode;
pub use store::StoredSurveyResponse;
