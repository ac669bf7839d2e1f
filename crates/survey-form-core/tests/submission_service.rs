// crates/survey-form-core/tests/submission_service.rs
// ============================================================================
// Module: Submission Service Tests
// Description: End-to-end pipeline tests over in-memory collaborators.
// Purpose: Validate ordering of rate limiting, validation, and persistence.
// ============================================================================

//! ## Overview
//! Drives [`SubmissionService`] with the in-memory store and the fixed-window
//! limiter:
//! - Valid payloads persist exactly the submitted values
//! - Invalid or malformed payloads persist nothing
//! - Rate limiting wins over payload validity
//! - Store failures surface as storage errors

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::time::Duration;

use serde_json::Value;
use serde_json::json;
use survey_form_core::ContactMethod;
use survey_form_core::FieldName;
use survey_form_core::FixedWindowRateLimiter;
use survey_form_core::InMemorySurveyStore;
use survey_form_core::RateLimitPolicy;
use survey_form_core::ResponseId;
use survey_form_core::SharedRateLimiter;
use survey_form_core::SharedSurveyStore;
use survey_form_core::StoreError;
use survey_form_core::SubmissionError;
use survey_form_core::SubmissionService;
use survey_form_core::SurveyResponse;
use survey_form_core::SurveyStore;

// ============================================================================
// SECTION: Helpers
// ============================================================================

struct FailingStore;

impl SurveyStore for FailingStore {
    fn create(&self, _response: &SurveyResponse) -> Result<ResponseId, StoreError> {
        Err(StoreError::Io("disk unavailable".to_string()))
    }
}

fn limiter(max_requests: u32) -> SharedRateLimiter {
    SharedRateLimiter::from_limiter(FixedWindowRateLimiter::new(RateLimitPolicy {
        max_requests,
        window: Duration::from_secs(60),
        max_entries: 64,
    }))
}

fn service(store: &InMemorySurveyStore, max_requests: u32) -> SubmissionService {
    SubmissionService::new(SharedSurveyStore::from_store(store.clone()), limiter(max_requests))
}

fn valid_payload() -> Value {
    json!({
        "name": "Ana Lopez",
        "email": "ana@x.com",
        "age": 30,
        "phoneNumber": "5551234567",
        "occupation": "Engineer",
        "hobby": "Chess",
        "preferredContactMethod": "EMAIL",
        "feedback": "Great form"
    })
}

fn body(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn valid_submission_persists_one_record() {
    let store = InMemorySurveyStore::new();
    let service = service(&store, 5);
    let receipt = service.submit("10.0.0.1", &body(&valid_payload())).unwrap();
    assert_eq!(receipt.response_id, ResponseId::new(1));

    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    let (_, stored) = &records[0];
    assert_eq!(stored.name, "Ana Lopez");
    assert_eq!(stored.email, "ana@x.com");
    assert_eq!(stored.age, 30);
    assert_eq!(stored.phone_number, "5551234567");
    assert_eq!(stored.occupation, "Engineer");
    assert_eq!(stored.hobby, "Chess");
    assert_eq!(stored.preferred_contact_method, ContactMethod::Email);
    assert_eq!(stored.feedback, "Great form");
}

#[test]
fn invalid_email_persists_nothing() {
    let store = InMemorySurveyStore::new();
    let service = service(&store, 5);
    let mut payload = valid_payload();
    payload["email"] = json!("not-an-email");
    let err = service.submit("10.0.0.1", &body(&payload)).unwrap_err();
    match err {
        SubmissionError::Validation(errors) => {
            assert_eq!(errors.fields(), vec![FieldName::Email]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.is_empty().unwrap());
}

#[test]
fn malformed_json_is_an_invalid_request() {
    let store = InMemorySurveyStore::new();
    let service = service(&store, 5);
    let err = service.submit("10.0.0.1", b"{\"name\": ").unwrap_err();
    assert!(matches!(err, SubmissionError::MalformedBody(_)));
    assert!(err.is_invalid_request());
    assert!(store.is_empty().unwrap());
}

#[test]
fn rate_limit_applies_before_validation() {
    let store = InMemorySurveyStore::new();
    let service = service(&store, 2);
    service.submit("10.0.0.1", &body(&valid_payload())).unwrap();
    let err = service.submit("10.0.0.1", b"not json").unwrap_err();
    assert!(matches!(err, SubmissionError::MalformedBody(_)));

    let err = service.submit("10.0.0.1", &body(&valid_payload())).unwrap_err();
    assert_eq!(err, SubmissionError::RateLimited);
    let err = service.submit("10.0.0.1", b"not json").unwrap_err();
    assert_eq!(err, SubmissionError::RateLimited);
    assert_eq!(store.len().unwrap(), 1);

    assert!(service.submit("10.0.0.2", &body(&valid_payload())).is_ok());
}

#[test]
fn duplicate_submissions_create_duplicate_records() {
    let store = InMemorySurveyStore::new();
    let service = service(&store, 5);
    let first = service.submit("10.0.0.1", &body(&valid_payload())).unwrap();
    let second = service.submit("10.0.0.1", &body(&valid_payload())).unwrap();
    assert_ne!(first.response_id, second.response_id);
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn store_failure_maps_to_storage_error() {
    let service = SubmissionService::new(SharedSurveyStore::from_store(FailingStore), limiter(5));
    let err = service.submit("10.0.0.1", &body(&valid_payload())).unwrap_err();
    assert_eq!(err.kind(), "storage");
    assert!(!err.is_invalid_request());
}
