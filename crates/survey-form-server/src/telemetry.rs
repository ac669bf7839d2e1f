// crates/survey-form-server/src/telemetry.rs
// ============================================================================
// Module: Form Telemetry
// Description: Metric hooks for form submission handling.
// Purpose: Provide request counters and latency hooks without hard deps.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A thin metrics interface for submission counters and latency histograms.
//! Deployments plug in their own exporter by implementing [`FormMetrics`].
//! Labels never carry submitted field values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Route label for the submission endpoint.
pub const FORM_ROUTE: &str = "/api/v1/form";

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Submission outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormOutcome {
    /// The submission was stored.
    Accepted,
    /// The client was rate limited.
    RateLimited,
    /// The payload was rejected.
    Invalid,
    /// The server failed to store the submission.
    Failed,
}

impl FormOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::RateLimited => "rate_limited",
            Self::Invalid => "invalid",
            Self::Failed => "failed",
        }
    }
}

/// Submission metric event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMetricEvent {
    /// Route label.
    pub route: &'static str,
    /// Request outcome.
    pub outcome: FormOutcome,
    /// HTTP status code returned.
    pub status: u16,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for form submissions and latencies.
pub trait FormMetrics: Send + Sync {
    /// Records a request counter event.
    fn record_request(&self, event: FormMetricEvent);
    /// Records a latency observation for the request.
    fn record_latency(&self, event: FormMetricEvent, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl FormMetrics for NoopMetrics {
    fn record_request(&self, _event: FormMetricEvent) {}

    fn record_latency(&self, _event: FormMetricEvent, _latency: Duration) {}
}
