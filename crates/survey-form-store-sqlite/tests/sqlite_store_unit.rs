// crates/survey-form-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Survey Store Unit Tests
// Description: Targeted tests for the SQLite survey store.
// Purpose: Validate path safety, schema versioning, round trips, and
//          concurrent inserts.
// ============================================================================

//! ## Overview
//! Unit-level tests for `SQLite` store invariants:
//! - Path safety checks (empty/component/directory rejection)
//! - Schema version validation
//! - Stored rows keep exactly the submitted values
//! - Corrupt rows fail closed on load
//! - Concurrent inserts all land

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

use std::path::Path;
use std::path::PathBuf;
use std::thread;

use rusqlite::Connection;
use rusqlite::params;
use survey_form_core::ContactMethod;
use survey_form_core::ResponseId;
use survey_form_core::StoreError;
use survey_form_core::SurveyResponse;
use survey_form_core::SurveyStore;
use survey_form_store_sqlite::SqliteStoreConfig;
use survey_form_store_sqlite::SqliteStoreError;
use survey_form_store_sqlite::SqliteStoreMode;
use survey_form_store_sqlite::SqliteSurveyStore;
use survey_form_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn sample_response() -> SurveyResponse {
    SurveyResponse {
        name: "Ana Lopez".to_string(),
        email: "ana@x.com".to_string(),
        age: 30,
        phone_number: "5551234567".to_string(),
        occupation: "Engineer".to_string(),
        hobby: "Chess".to_string(),
        preferred_contact_method: ContactMethod::Email,
        feedback: "Great form".to_string(),
    }
}

fn config_for(path: &Path) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    }
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("survey.db")
}

// ============================================================================
// SECTION: Round Trip
// ============================================================================

#[test]
fn create_then_load_returns_submitted_values() {
    let dir = TempDir::new().unwrap();
    let store = SqliteSurveyStore::new(config_for(&db_path(&dir))).unwrap();
    let id = store.create(&sample_response()).unwrap();
    let stored = store.load_response(id).unwrap().expect("row");
    assert_eq!(stored.id, id);
    assert_eq!(stored.response, sample_response());
    assert!(stored.created_at_ms > 0);
    assert_eq!(store.count_responses().unwrap(), 1);
}

#[test]
fn missing_row_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let store = SqliteSurveyStore::new(config_for(&db_path(&dir))).unwrap();
    assert!(store.load_response(ResponseId::new(42)).unwrap().is_none());
}

#[test]
fn rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let id = {
        let store = SqliteSurveyStore::new(config_for(&path)).unwrap();
        store.create(&sample_response()).unwrap()
    };
    let reopened = SqliteSurveyStore::new(config_for(&path)).unwrap();
    assert_eq!(reopened.count_responses().unwrap(), 1);
    assert!(reopened.load_response(id).unwrap().is_some());
}

#[test]
fn duplicate_submissions_get_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let store = SqliteSurveyStore::new(config_for(&db_path(&dir))).unwrap();
    let first = store.create(&sample_response()).unwrap();
    let second = store.create(&sample_response()).unwrap();
    assert!(second > first);
    assert_eq!(store.count_responses().unwrap(), 2);
}

#[test]
fn readiness_succeeds_on_open_store() {
    let dir = TempDir::new().unwrap();
    let store = SqliteSurveyStore::new(SqliteStoreConfig::for_path(db_path(&dir))).unwrap();
    assert!(store.readiness().is_ok());
}

// ============================================================================
// SECTION: Path Safety
// ============================================================================

#[test]
fn empty_path_is_rejected() {
    let result = SqliteSurveyStore::new(config_for(Path::new("")));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn directory_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = SqliteSurveyStore::new(config_for(dir.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn overlong_component_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a".repeat(300));
    let result = SqliteSurveyStore::new(config_for(&path));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn parent_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("survey.db");
    let store = SqliteSurveyStore::new(config_for(&path)).unwrap();
    assert!(store.path().exists());
}

// ============================================================================
// SECTION: Schema Integrity
// ============================================================================

#[test]
fn unknown_schema_version_fails_closed() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    drop(SqliteSurveyStore::new(config_for(&path)).unwrap());
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = ?1", params![99]).unwrap();
    drop(connection);

    let result = SqliteSurveyStore::new(config_for(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn corrupt_age_fails_closed_on_load() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let store = SqliteSurveyStore::new(config_for(&path)).unwrap();
    let id = store.create(&sample_response()).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection
        .execute("UPDATE survey_responses SET age = ?1 WHERE id = ?2", params![1_000, id.get()])
        .unwrap();
    drop(connection);

    let result = store.load_response(id);
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn contact_method_column_rejects_unknown_tokens() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let store = SqliteSurveyStore::new(config_for(&path)).unwrap();
    let id = store.create(&sample_response()).unwrap();
    let connection = Connection::open(&path).unwrap();
    let result = connection.execute(
        "UPDATE survey_responses SET preferred_contact_method = 'SMS' WHERE id = ?1",
        params![id.get()],
    );
    assert!(result.is_err());
}

#[test]
fn sqlite_errors_map_to_store_errors() {
    let err: StoreError = SqliteStoreError::Db("locked".to_string()).into();
    assert_eq!(err, StoreError::Store("locked".to_string()));
    let err: StoreError = SqliteStoreError::VersionMismatch("v9".to_string()).into();
    assert_eq!(err, StoreError::VersionMismatch("v9".to_string()));
}

// ============================================================================
// SECTION: Concurrency
// ============================================================================

#[test]
fn concurrent_inserts_all_land() {
    let dir = TempDir::new().unwrap();
    let store = SqliteSurveyStore::new(config_for(&db_path(&dir))).unwrap();
    let handles: Vec<_> = (0 .. 8)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                for _ in 0 .. 10 {
                    store.create(&sample_response()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.count_responses().unwrap(), 80);
}
