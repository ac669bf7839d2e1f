// crates/survey-form-cli/src/tests/serve_policy.rs
// ============================================================================
// Module: Serve Policy Tests
// Description: Unit tests for CLI server bind safety rules.
// Purpose: Ensure non-loopback binding stays fail-closed without opt-in.
// Dependencies: survey-form-cli serve_policy, survey-form-config
// ============================================================================

//! ## Overview
//! Validates loopback binds pass, non-loopback binds require opt-in, and
//! the opt-in environment value parses strictly.

use survey_form_config::SurveyFormConfig;

use crate::serve_policy::ServePolicyError;
use crate::serve_policy::enforce_local_only;
use crate::serve_policy::parse_allow_non_loopback_value;

fn config_with_bind(bind: &str) -> SurveyFormConfig {
    let mut config = SurveyFormConfig::from_toml_str("").expect("default config");
    config.server.bind = bind.to_string();
    config
}

#[test]
fn loopback_is_local_only() {
    let outcome = enforce_local_only(&config_with_bind("127.0.0.1:3000"), false)
        .expect("loopback allowed");
    assert!(!outcome.network_exposed);
    assert_eq!(outcome.bind_addr.port(), 3000);
    assert!(outcome.trust_forwarded_for);
    assert!(outcome.audit_enabled);
}

#[test]
fn ipv6_loopback_is_local_only() {
    let outcome = enforce_local_only(&config_with_bind("[::1]:3000"), false).expect("allowed");
    assert!(!outcome.network_exposed);
}

#[test]
fn non_loopback_requires_opt_in() {
    let err = enforce_local_only(&config_with_bind("0.0.0.0:3000"), false)
        .expect_err("expected opt-in error");
    assert_eq!(
        err,
        ServePolicyError::NonLoopbackOptInRequired {
            bind: "0.0.0.0:3000".to_string(),
        }
    );
    assert!(err.to_string().contains("SURVEY_FORM_ALLOW_NON_LOOPBACK"));
}

#[test]
fn non_loopback_with_opt_in_reports_exposure() {
    let outcome =
        enforce_local_only(&config_with_bind("0.0.0.0:3000"), true).expect("opted in");
    assert!(outcome.network_exposed);
}

#[test]
fn invalid_bind_is_rejected() {
    let err = enforce_local_only(&config_with_bind("localhost"), true).expect_err("invalid bind");
    assert!(matches!(err, ServePolicyError::InvalidBind { .. }));
}

#[test]
fn allow_env_values_parse_strictly() {
    for value in ["1", "true", "YES", " on "] {
        assert_eq!(parse_allow_non_loopback_value(value), Ok(true), "value {value}");
    }
    for value in ["0", "false", "No", "off"] {
        assert_eq!(parse_allow_non_loopback_value(value), Ok(false), "value {value}");
    }
    assert_eq!(
        parse_allow_non_loopback_value("maybe"),
        Err(ServePolicyError::InvalidEnv {
            value: "maybe".to_string(),
        })
    );
}
