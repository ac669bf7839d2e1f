// crates/survey-form-server/src/server.rs
// ============================================================================
// Module: Survey Form Server
// Description: HTTP adapter for the submission pipeline.
// Purpose: Expose POST /api/v1/form plus health and readiness probes.
// Dependencies: survey-form-core, survey-form-config, survey-form-store-sqlite, axum, tokio,
//               http-body-util
// ============================================================================

//! ## Overview
//! The server wires configuration into a [`SubmissionService`] and serves it
//! over axum. The handler resolves the client identifier, consults the rate
//! limiter before the body is read, then parses, validates, and persists the
//! payload on the blocking pool. Every submission emits one audit event and
//! one metrics event.
//!
//! Status mapping:
//! - 200 with `{"message":"Form data submitted successfully."}` on success.
//! - 429 `Rate limited` when the client exhausted its window.
//! - 422 `Invalid request data passed` for malformed, oversized, or invalid
//!   payloads.
//! - 500 `Something went wrong, please try again later` otherwise.
//!
//! Security posture: request bodies and headers are untrusted. Field values
//! never reach logs or metrics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error;
use std::future::Future;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use http_body_util::LengthLimitError;
use serde_json::json;
use survey_form_config::ServerAuditConfig;
use survey_form_config::ServerConfig;
use survey_form_config::StoreConfig;
use survey_form_config::StoreType;
use survey_form_config::SurveyFormConfig;
use survey_form_core::FixedWindowRateLimiter;
use survey_form_core::InMemorySurveyStore;
use survey_form_core::RateLimitPolicy;
use survey_form_core::SharedRateLimiter;
use survey_form_core::SharedSurveyStore;
use survey_form_core::StoreError;
use survey_form_core::SubmissionError;
use survey_form_core::SubmissionReceipt;
use survey_form_core::SubmissionService;
use survey_form_core::SurveyStore;
use survey_form_store_sqlite::SqliteSurveyStore;
use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;

use crate::audit::FormAuditEvent;
use crate::audit::FormAuditEventParams;
use crate::audit::FormAuditSink;
use crate::audit::FormFileAuditSink;
use crate::audit::FormNoopAuditSink;
use crate::audit::FormStderrAuditSink;
use crate::telemetry::FORM_ROUTE;
use crate::telemetry::FormMetricEvent;
use crate::telemetry::FormMetrics;
use crate::telemetry::FormOutcome;
use crate::telemetry::NoopMetrics;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Success acknowledgment message.
pub const SUCCESS_MESSAGE: &str = "Form data submitted successfully.";
/// Body for 429 responses.
pub const RATE_LIMITED_MESSAGE: &str = "Rate limited";
/// Body for 422 responses.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request data passed";
/// Body for 500 responses.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong, please try again later";
/// Client identifier used when neither header nor peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";
/// Header consulted for the originating client address.
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Survey form HTTP server.
pub struct SurveyFormServer {
    /// Resolved listen address.
    bind: SocketAddr,
    /// Handler state shared by all requests.
    state: ServerState,
    /// Concrete limiter kept for the purge sweep.
    limiter: Arc<FixedWindowRateLimiter>,
}

impl SurveyFormServer {
    /// Builds a server from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the store or
    /// audit sink cannot be opened.
    pub fn from_config(config: SurveyFormConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let bind = config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_store(&config.store)?;
        let rate_limit = &config.server.limits.rate_limit;
        let limiter = Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy {
            max_requests: rate_limit.max_requests,
            window: rate_limit.window(),
            max_entries: rate_limit.max_entries,
        }));
        let audit = build_audit_sink(&config.server.audit)?;
        let shared_limiter = SharedRateLimiter::new(Arc::clone(&limiter) as _);
        let service = SubmissionService::new(store, shared_limiter);
        let state = build_server_state(service, &config.server, Arc::new(NoopMetrics), audit);
        Ok(Self {
            bind,
            state,
            limiter,
        })
    }

    /// Replaces the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn FormMetrics>) -> Self {
        self.state.metrics = metrics;
        self
    }

    /// Returns the configured listen address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind)
            .await
            .map_err(|err| ServerError::Transport(format!("bind {} failed: {err}", self.bind)))?;
        self.serve_on(listener, ctrl_c_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let window = self.limiter.policy().window;
        let sweeper = tokio::spawn(purge_expired_entries(Arc::clone(&self.limiter), window));
        let app = build_router(Arc::new(self.state));
        let result = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")));
        sweeper.abort();
        result
    }
}

/// Builds the response store from configuration.
fn build_store(config: &StoreConfig) -> Result<SharedSurveyStore, ServerError> {
    let store = match config.store_type {
        StoreType::Memory => SharedSurveyStore::from_store(InMemorySurveyStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config.sqlite_config().ok_or_else(|| {
                ServerError::Config("sqlite store requires path".to_string())
            })?;
            let store = SqliteSurveyStore::new(sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            SharedSurveyStore::from_store(store)
        }
    };
    Ok(store)
}

/// Builds the audit sink from configuration.
fn build_audit_sink(config: &ServerAuditConfig) -> Result<Arc<dyn FormAuditSink>, ServerError> {
    if !config.enabled {
        return Ok(Arc::new(FormNoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => {
            let sink = FormFileAuditSink::new(Path::new(path)).map_err(|err| {
                ServerError::Init(format!("audit log {path} unavailable: {err}"))
            })?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(FormStderrAuditSink)),
    }
}

/// Drops expired limiter entries once per window.
async fn purge_expired_entries(limiter: Arc<FixedWindowRateLimiter>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        limiter.purge_expired();
    }
}

/// Resolves when the process receives Ctrl-C.
async fn ctrl_c_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Shared state for HTTP handlers.
#[derive(Clone)]
struct ServerState {
    /// Submission pipeline.
    service: SubmissionService,
    /// Maximum accepted request body size.
    max_body_bytes: usize,
    /// Whether `X-Forwarded-For` identifies the client.
    trust_forwarded_for: bool,
    /// Metrics sink.
    metrics: Arc<dyn FormMetrics>,
    /// Audit sink.
    audit: Arc<dyn FormAuditSink>,
}

/// Assembles handler state from server configuration.
fn build_server_state(
    service: SubmissionService,
    config: &ServerConfig,
    metrics: Arc<dyn FormMetrics>,
    audit: Arc<dyn FormAuditSink>,
) -> ServerState {
    ServerState {
        service,
        max_body_bytes: config.max_body_bytes,
        trust_forwarded_for: config.client_identity.trust_forwarded_for,
        metrics,
        audit,
    }
}

/// Builds the axum router.
fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(FORM_ROUTE, post(handle_submit))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .with_state(state)
}

// ============================================================================
// SECTION: Client Identity
// ============================================================================

/// Resolves the rate limit key for a request.
///
/// Order: first non-empty `X-Forwarded-For` entry (when trusted), then the
/// peer IP, then [`UNKNOWN_CLIENT`].
#[must_use]
pub fn resolve_client_id(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trust_forwarded_for: bool,
) -> String {
    if trust_forwarded_for
        && let Some(forwarded) =
            headers.get(FORWARDED_FOR_HEADER).and_then(|value| value.to_str().ok())
        && let Some(first) = forwarded.split(',').next().map(str::trim)
        && !first.is_empty()
    {
        return first.to_string();
    }
    peer.map_or_else(|| UNKNOWN_CLIENT.to_string(), |ip| ip.to_string())
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /api/v1/form`.
async fn handle_submit(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let started = Instant::now();
    let client_id = resolve_client_id(&headers, Some(peer.ip()), state.trust_forwarded_for);
    let (result, request_bytes) = run_submission(&state, &client_id, body).await;
    let outcome = classify(&result);
    let status = status_for(outcome);
    let event = FormMetricEvent {
        route: FORM_ROUTE,
        outcome,
        status: status.as_u16(),
    };
    state.metrics.record_request(event.clone());
    state.metrics.record_latency(event, started.elapsed());
    state.audit.record(&FormAuditEvent::new(FormAuditEventParams {
        client_id,
        outcome,
        status: status.as_u16(),
        error_kind: result.as_ref().err().map(SubmissionError::kind),
        field_errors: match &result {
            Err(SubmissionError::Validation(errors)) => errors.fields(),
            _ => Vec::new(),
        },
        request_bytes,
        response_id: result.as_ref().ok().map(|receipt| receipt.response_id),
    }));
    response_for(outcome)
}

/// Admits, reads, and processes one submission; returns the body size read.
async fn run_submission(
    state: &ServerState,
    client_id: &str,
    body: Body,
) -> (Result<SubmissionReceipt, SubmissionError>, usize) {
    if let Err(err) = state.service.admit(client_id) {
        return (Err(err), 0);
    }
    let bytes = match read_body(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => return (Err(err), 0),
    };
    let request_bytes = bytes.len();
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.process(&bytes))
        .await
        .unwrap_or_else(|err| {
            let message = format!("submission task failed: {err}");
            Err(SubmissionError::Storage(StoreError::Store(message)))
        });
    (result, request_bytes)
}

/// Collects the request body, failing once `max_bytes` is exceeded.
async fn read_body(body: Body, max_bytes: usize) -> Result<Bytes, SubmissionError> {
    axum::body::to_bytes(body, max_bytes).await.map_err(|err| body_read_error(err, max_bytes))
}

/// Maps a body read failure: the length limit is `PayloadTooLarge`, anything
/// else (disconnects, truncated chunks) is a malformed body.
fn body_read_error(err: axum::Error, max_bytes: usize) -> SubmissionError {
    let source = err.into_inner();
    let mut chain: Option<&(dyn Error + 'static)> = Some(&*source);
    while let Some(current) = chain {
        if current.is::<LengthLimitError>() {
            return SubmissionError::PayloadTooLarge {
                max_bytes,
            };
        }
        chain = current.source();
    }
    SubmissionError::MalformedBody(source.to_string())
}

/// Classifies a pipeline result.
fn classify(result: &Result<SubmissionReceipt, SubmissionError>) -> FormOutcome {
    match result {
        Ok(_) => FormOutcome::Accepted,
        Err(SubmissionError::RateLimited) => FormOutcome::RateLimited,
        Err(err) if err.is_invalid_request() => FormOutcome::Invalid,
        Err(_) => FormOutcome::Failed,
    }
}

/// Maps an outcome to its HTTP status.
const fn status_for(outcome: FormOutcome) -> StatusCode {
    match outcome {
        FormOutcome::Accepted => StatusCode::OK,
        FormOutcome::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        FormOutcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        FormOutcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the client-facing response for an outcome.
fn response_for(outcome: FormOutcome) -> Response {
    let status = status_for(outcome);
    match outcome {
        FormOutcome::Accepted => {
            (status, Json(json!({ "message": SUCCESS_MESSAGE }))).into_response()
        }
        FormOutcome::RateLimited => (status, RATE_LIMITED_MESSAGE).into_response(),
        FormOutcome::Invalid => (status, INVALID_REQUEST_MESSAGE).into_response(),
        FormOutcome::Failed => (status, INTERNAL_ERROR_MESSAGE).into_response(),
    }
}

/// Handles `GET /health`.
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Handles `GET /ready` by probing the store.
async fn handle_ready(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let store = state.service.store().clone();
    let ready = tokio::task::spawn_blocking(move || store.readiness())
        .await
        .is_ok_and(|probe| probe.is_ok());
    if ready {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "not_ready" })))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Survey form server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
