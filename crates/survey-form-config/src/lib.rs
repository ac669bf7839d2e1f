// crates/survey-form-config/src/lib.rs
// ============================================================================
// Module: Survey Form Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for survey-form.toml semantics.
// Dependencies: survey-form-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `survey-form-config` defines the configuration model for the survey form
//! server. It provides strict, fail-closed validation and a canonical example
//! file.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
