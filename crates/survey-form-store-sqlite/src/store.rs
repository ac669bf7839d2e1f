// crates/survey-form-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Survey Store
// Description: Durable SurveyStore backed by SQLite.
// Purpose: Persist validated survey responses in an append-only table.
// Dependencies: survey-form-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`SurveyStore`] using `SQLite`. Each
//! accepted submission becomes one row in `survey_responses`, written inside
//! its own transaction. Rows are never updated or deleted.
//! Security posture: database contents are untrusted on read; loads re-check
//! enum tokens and numeric ranges and fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use survey_form_core::ContactMethod;
use survey_form_core::ResponseId;
use survey_form_core::StoreError;
use survey_form_core::SurveyResponse;
use survey_form_core::SurveyStore;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` survey store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config for `path` with default tuning.
    #[must_use]
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Default busy timeout used by serde.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw response field values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Stored row with its store-assigned metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSurveyResponse {
    /// Row identifier.
    pub id: ResponseId,
    /// Persisted response values.
    pub response: SurveyResponse,
    /// Insert time (milliseconds since epoch).
    pub created_at_ms: i64,
}

/// `SQLite`-backed survey store.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - Each insert runs in its own transaction.
#[derive(Clone)]
pub struct SqliteSurveyStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared connection.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteSurveyStore {
    /// Opens an `SQLite`-backed survey store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Inserts one response and returns its row identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the insert or commit fails.
    pub fn insert_response(
        &self,
        response: &SurveyResponse,
    ) -> Result<ResponseId, SqliteStoreError> {
        let created_at_ms = now_millis();
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(
            "INSERT INTO survey_responses (
                name, email, age, phone_number, occupation, hobby,
                preferred_contact_method, feedback, created_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                response.name,
                response.email,
                i64::from(response.age),
                response.phone_number,
                response.occupation,
                response.hobby,
                response.preferred_contact_method.as_str(),
                response.feedback,
                created_at_ms,
            ],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(ResponseId::new(id))
    }

    /// Loads a stored response by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails or the row holds
    /// values the schema cannot represent.
    pub fn load_response(
        &self,
        id: ResponseId,
    ) -> Result<Option<StoredSurveyResponse>, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))?;
        let row = guard
            .query_row(
                "SELECT id, name, email, age, phone_number, occupation, hobby,
                        preferred_contact_method, feedback, created_at_ms
                 FROM survey_responses WHERE id = ?1",
                params![id.get()],
                |row| {
                    Ok(RawResponseRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        age: row.get(3)?,
                        phone_number: row.get(4)?,
                        occupation: row.get(5)?,
                        hobby: row.get(6)?,
                        preferred_contact_method: row.get(7)?,
                        feedback: row.get(8)?,
                        created_at_ms: row.get(9)?,
                    })
                },
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        row.map(RawResponseRow::into_stored).transpose()
    }

    /// Returns the number of stored responses.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn count_responses(&self) -> Result<u64, SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))?;
        let count: i64 = guard
            .query_row("SELECT COUNT(1) FROM survey_responses", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Invalid("negative row count".to_string()))
    }

    /// Verifies the store can execute a simple SQL statement.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] if the mutex is poisoned or the query fails.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))?;
        guard
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl SurveyStore for SqliteSurveyStore {
    fn create(&self, response: &SurveyResponse) -> Result<ResponseId, StoreError> {
        self.insert_response(response).map_err(StoreError::from)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.check_connection().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Untyped row as read from `SQLite`.
struct RawResponseRow {
    /// Row identifier.
    id: i64,
    /// Name column.
    name: String,
    /// Email column.
    email: String,
    /// Age column.
    age: i64,
    /// Phone number column.
    phone_number: String,
    /// Occupation column.
    occupation: String,
    /// Hobby column.
    hobby: String,
    /// Contact method token column.
    preferred_contact_method: String,
    /// Feedback column.
    feedback: String,
    /// Insert time column.
    created_at_ms: i64,
}

impl RawResponseRow {
    /// Converts the raw row into typed values, failing closed on bad data.
    fn into_stored(self) -> Result<StoredSurveyResponse, SqliteStoreError> {
        let age = u8::try_from(self.age).map_err(|_| {
            SqliteStoreError::Invalid(format!("row {} has out-of-range age", self.id))
        })?;
        let preferred_contact_method = ContactMethod::from_token(&self.preferred_contact_method)
            .ok_or_else(|| {
                SqliteStoreError::Invalid(format!("row {} has unknown contact method", self.id))
            })?;
        Ok(StoredSurveyResponse {
            id: ResponseId::new(self.id),
            response: SurveyResponse {
                name: self.name,
                email: self.email,
                age,
                phone_number: self.phone_number,
                occupation: self.occupation,
                hobby: self.hobby,
                preferred_contact_method,
                feedback: self.feedback,
            },
            created_at_ms: self.created_at_ms,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current wall clock in milliseconds since epoch.
fn now_millis() -> i64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    i64::try_from(millis).unwrap_or(i64::MAX)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS survey_responses (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    age INTEGER NOT NULL,
                    phone_number TEXT NOT NULL,
                    occupation TEXT NOT NULL,
                    hobby TEXT NOT NULL,
                    preferred_contact_method TEXT NOT NULL
                        CHECK (preferred_contact_method IN ('EMAIL', 'PHONE')),
                    feedback TEXT NOT NULL,
                    created_at_ms INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_survey_responses_created_at
                    ON survey_responses (created_at_ms);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version {other} (expected {SCHEMA_VERSION})"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
