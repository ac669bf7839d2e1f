// crates/survey-form-server/src/audit.rs
// ============================================================================
// Module: Form Audit Logging
// Description: Structured audit events for form submissions.
// Purpose: Emit redacted JSON-line audit records without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit event payloads and sinks for submission logging. Events carry the
//! client identifier, outcome, and the *names* of failing fields; submitted
//! values are never recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use survey_form_core::FieldName;
use survey_form_core::ResponseId;

use crate::telemetry::FormOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Form submission audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct FormAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Resolved client identifier.
    pub client_id: String,
    /// Request outcome.
    pub outcome: FormOutcome,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Names of fields that failed validation.
    pub field_errors: Vec<FieldName>,
    /// Request body size in bytes (zero when the body was never read).
    pub request_bytes: usize,
    /// Store identifier for accepted submissions.
    pub response_id: Option<ResponseId>,
}

/// Inputs required to construct an audit event.
pub struct FormAuditEventParams {
    /// Resolved client identifier.
    pub client_id: String,
    /// Request outcome.
    pub outcome: FormOutcome,
    /// HTTP status code returned.
    pub status: u16,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Names of fields that failed validation.
    pub field_errors: Vec<FieldName>,
    /// Request body size in bytes.
    pub request_bytes: usize,
    /// Store identifier for accepted submissions.
    pub response_id: Option<ResponseId>,
}

impl FormAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: FormAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "form_submission",
            timestamp_ms,
            client_id: params.client_id,
            outcome: params.outcome,
            status: params.status,
            error_kind: params.error_kind,
            field_errors: params.field_errors,
            request_bytes: params.request_bytes,
            response_id: params.response_id,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for form submission events.
pub trait FormAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &FormAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct FormStderrAuditSink;

impl FormAuditSink for FormStderrAuditSink {
    fn record(&self, event: &FormAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FormFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FormFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FormAuditSink for FormFileAuditSink {
    fn record(&self, event: &FormAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct FormNoopAuditSink;

impl FormAuditSink for FormNoopAuditSink {
    fn record(&self, _event: &FormAuditEvent) {}
}
