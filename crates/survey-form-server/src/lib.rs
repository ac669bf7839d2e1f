// crates/survey-form-server/src/lib.rs
// ============================================================================
// Module: Survey Form Server Library
// Description: HTTP server, audit sinks, and metrics hooks.
// Purpose: Serve the survey submission endpoint over axum.
// Dependencies: survey-form-core, survey-form-config, axum, tokio
// ============================================================================

//! ## Overview
//! `survey-form-server` exposes `POST /api/v1/form`, `GET /health`, and
//! `GET /ready`. Submission logic lives in `survey-form-core`; this crate owns
//! transport, client identity resolution, and observability hooks.
//!
//! Security posture: all HTTP input is untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod server;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FormAuditEvent;
pub use audit::FormAuditEventParams;
pub use audit::FormAuditSink;
pub use audit::FormFileAuditSink;
pub use audit::FormNoopAuditSink;
pub use audit::FormStderrAuditSink;
pub use server::INTERNAL_ERROR_MESSAGE;
pub use server::INVALID_REQUEST_MESSAGE;
pub use server::RATE_LIMITED_MESSAGE;
pub use server::SUCCESS_MESSAGE;
pub use server::ServerError;
pub use server::SurveyFormServer;
pub use server::UNKNOWN_CLIENT;
pub use server::resolve_client_id;
pub use telemetry::FORM_ROUTE;
pub use telemetry::FormMetricEvent;
pub use telemetry::FormMetrics;
pub use telemetry::FormOutcome;
pub use telemetry::NoopMetrics;
