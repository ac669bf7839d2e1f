// crates/survey-form-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for survey-form-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use survey_form_config::RateLimitConfig;
use survey_form_config::SurveyFormConfig;

/// Parses a TOML string into a `SurveyFormConfig` without validation.
pub fn config_from_toml(toml_str: &str) -> Result<SurveyFormConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<SurveyFormConfig, toml::de::Error> {
    config_from_toml("")
}

/// Returns a minimal config with the provided rate limit.
pub fn config_with_rate_limit(
    rate_limit: RateLimitConfig,
) -> Result<SurveyFormConfig, toml::de::Error> {
    let mut config = minimal_config()?;
    config.server.limits.rate_limit = rate_limit;
    Ok(config)
}
