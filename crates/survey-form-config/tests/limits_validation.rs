//! Limits validation tests for survey-form-config.
// crates/survey-form-config/tests/limits_validation.rs
// =============================================================================
// Module: Limits Validation Tests
// Description: Tests for MAX_*/MIN_* constant enforcement.
// Purpose: Ensure numeric and size limits are properly enforced.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use survey_form_config::ConfigError;
use survey_form_config::MAX_BODY_BYTES_LIMIT;
use survey_form_config::MAX_RATE_LIMIT_ENTRIES;
use survey_form_config::MAX_RATE_LIMIT_REQUESTS;
use survey_form_config::MAX_RATE_LIMIT_WINDOW_MS;
use survey_form_config::MAX_STORE_BUSY_TIMEOUT_MS;
use survey_form_config::MIN_RATE_LIMIT_WINDOW_MS;
use survey_form_config::RateLimitConfig;
use survey_form_config::StoreType;

mod common;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(ConfigError::Invalid(message)) if message.contains(needle) => Ok(()),
        Err(other) => Err(format!("unexpected error: {other}")),
        Ok(()) => Err(format!("expected invalid config containing {needle:?}")),
    }
}

fn rate_limit(max_requests: u32, window_ms: u64, max_entries: usize) -> RateLimitConfig {
    RateLimitConfig {
        max_requests,
        window_ms,
        max_entries,
    }
}

// ============================================================================
// SECTION: Rate Limit
// ============================================================================

#[test]
fn rate_limit_accepts_bounds() -> TestResult {
    for window_ms in [MIN_RATE_LIMIT_WINDOW_MS, 60_000, MAX_RATE_LIMIT_WINDOW_MS] {
        let config = common::config_with_rate_limit(rate_limit(
            MAX_RATE_LIMIT_REQUESTS,
            window_ms,
            MAX_RATE_LIMIT_ENTRIES,
        ))
        .map_err(|err| err.to_string())?;
        config.validate().map_err(|err| err.to_string())?;
    }
    Ok(())
}

#[test]
fn rate_limit_rejects_zero_requests() -> TestResult {
    let config = common::config_with_rate_limit(rate_limit(0, 60_000, 16))
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "max_requests must be greater than zero")
}

#[test]
fn rate_limit_rejects_too_many_requests() -> TestResult {
    let config =
        common::config_with_rate_limit(rate_limit(MAX_RATE_LIMIT_REQUESTS + 1, 60_000, 16))
            .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "max_requests too large")
}

#[test]
fn rate_limit_rejects_window_out_of_range() -> TestResult {
    for window_ms in [MIN_RATE_LIMIT_WINDOW_MS - 1, MAX_RATE_LIMIT_WINDOW_MS + 1] {
        let config = common::config_with_rate_limit(rate_limit(5, window_ms, 16))
            .map_err(|err| err.to_string())?;
        assert_invalid(config.validate(), "window_ms must be between")?;
    }
    Ok(())
}

#[test]
fn rate_limit_rejects_entry_bounds() -> TestResult {
    let config =
        common::config_with_rate_limit(rate_limit(5, 60_000, 0)).map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "max_entries must be greater than zero")?;
    let config = common::config_with_rate_limit(rate_limit(5, 60_000, MAX_RATE_LIMIT_ENTRIES + 1))
        .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "max_entries too large")
}

// ============================================================================
// SECTION: Server And Store
// ============================================================================

#[test]
fn max_body_bytes_bounds_are_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "max_body_bytes must be greater than zero")?;
    config.server.max_body_bytes = MAX_BODY_BYTES_LIMIT + 1;
    assert_invalid(config.validate(), "max_body_bytes must be at most")?;
    config.server.max_body_bytes = MAX_BODY_BYTES_LIMIT;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn busy_timeout_is_bounded() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = Some("survey.db".into());
    config.store.busy_timeout_ms = MAX_STORE_BUSY_TIMEOUT_MS + 1;
    assert_invalid(config.validate(), "busy_timeout_ms must be at most")
}

#[test]
fn audit_path_must_be_non_empty() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.server.audit.path = Some("  ".to_string());
    assert_invalid(config.validate(), "server.audit.path must be non-empty")
}
