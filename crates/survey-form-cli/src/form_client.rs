// crates/survey-form-cli/src/form_client.rs
// ============================================================================
// Module: Form Client
// Description: HTTP client for the survey form submission endpoint.
// Purpose: Validate locally, submit JSON, and map responses to notifications.
// Dependencies: reqwest, serde_json, url, survey-form-core
// ============================================================================

//! ## Overview
//! [`FormClient`] runs the shared schema before any network call and submits
//! only valid payloads to `POST /api/v1/form`. Responses are classified into
//! a [`SubmissionOutcome`], which renders as a single [`Notification`].
//!
//! Security posture: server responses are untrusted; bodies are size-limited
//! and redirects are never followed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use reqwest::Client;
use reqwest::redirect::Policy;
use serde_json::Value;
use survey_form_core::ContactMethod;
use survey_form_core::FieldErrors;
use survey_form_core::FieldName;
use survey_form_core::SurveyResponse;
use survey_form_core::validate_submission;
use survey_form_server::FORM_ROUTE;
use thiserror::Error;
use url::Url;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the form endpoint.
pub const MAX_FORM_RESPONSE_BYTES: usize = 64 * 1024;

/// Default request timeout for form submissions.
pub const DEFAULT_FORM_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Types
// ============================================================================

/// Form client configuration.
#[derive(Debug, Clone)]
pub struct FormClientConfig {
    /// Server base URL or full form URL.
    pub endpoint: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl FormClientConfig {
    /// Builds a configuration with the default timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_FORM_TIMEOUT,
        }
    }
}

/// Form client errors.
#[derive(Debug, Error)]
pub enum FormClientError {
    /// Client configuration error.
    #[error("form client config error: {0}")]
    Config(String),
    /// Payload failed local validation; nothing was sent.
    #[error("submission is invalid: {0}")]
    Invalid(FieldErrors),
    /// Transport error; carries the underlying error text.
    #[error("{0}")]
    Transport(String),
    /// Response size exceeds limits.
    #[error("form response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Actual size in bytes.
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

/// Classified endpoint response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 2xx: the submission was stored.
    Accepted,
    /// 422: the server rejected the payload.
    Invalid,
    /// 429: the client exceeded its allowance.
    RateLimited,
    /// Any other status.
    Failed {
        /// HTTP status code.
        status: u16,
    },
}

impl SubmissionOutcome {
    /// Classifies an HTTP status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            200 ..= 299 => Self::Accepted,
            422 => Self::Invalid,
            429 => Self::RateLimited,
            _ => Self::Failed {
                status,
            },
        }
    }

    /// Returns the notification shown for this outcome.
    #[must_use]
    pub fn notification(self) -> Notification {
        match self {
            Self::Accepted => Notification {
                title: t!("notify.success.title"),
                description: t!("notify.success.description"),
                variant: NotificationVariant::Default,
            },
            Self::Invalid => Notification::error(t!("notify.error.invalid")),
            Self::RateLimited => Notification::error(t!("notify.error.rate_limited")),
            Self::Failed {
                status,
            } => Notification::error(t!("notify.error.status", status = status)),
        }
    }
}

/// Visual treatment for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    /// Neutral/success styling.
    Default,
    /// Error styling.
    Destructive,
}

/// A single user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title.
    pub title: String,
    /// Description line.
    pub description: String,
    /// Visual treatment.
    pub variant: NotificationVariant,
}

impl Notification {
    /// Builds a destructive notification with the shared error title.
    fn error(description: String) -> Self {
        Self {
            title: t!("notify.error.title"),
            description,
            variant: NotificationVariant::Destructive,
        }
    }

    /// Renders the notification as one output line.
    #[must_use]
    pub fn render(&self) -> String {
        t!("notify.line", title = self.title, description = self.description)
    }
}

impl FormClientError {
    /// Returns the notification shown for a failed submission attempt.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Invalid(_) => Notification::error(t!("notify.error.invalid")),
            other => Notification::error(other.to_string()),
        }
    }
}

/// Endpoint reply after a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct SubmissionReply {
    /// HTTP status code.
    pub status: u16,
    /// Classified outcome.
    pub outcome: SubmissionOutcome,
    /// Response body text (lossy UTF-8).
    pub body: String,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the survey form endpoint.
#[derive(Debug, Clone)]
pub struct FormClient {
    /// Underlying HTTP client.
    client: Client,
    /// Resolved form URL.
    url: Url,
}

impl FormClient {
    /// Builds a form client.
    ///
    /// # Errors
    ///
    /// Returns [`FormClientError::Config`] when the endpoint is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: FormClientConfig) -> Result<Self, FormClientError> {
        let url = resolve_form_url(&config.endpoint)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|err| FormClientError::Config(err.to_string()))?;
        Ok(Self {
            client,
            url,
        })
    }

    /// Returns the resolved form URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Validates a raw JSON payload and submits it when valid.
    ///
    /// # Errors
    ///
    /// Returns [`FormClientError::Invalid`] without any network call when the
    /// payload fails the schema, or a transport error when the exchange fails.
    pub async fn submit(&self, payload: &Value) -> Result<SubmissionReply, FormClientError> {
        let response = validate_submission(payload).map_err(FormClientError::Invalid)?;
        self.send(&response).await
    }

    /// Validates a typed response and submits it when valid.
    ///
    /// # Errors
    ///
    /// Returns [`FormClientError`] when validation or the exchange fails.
    pub async fn submit_response(
        &self,
        response: &SurveyResponse,
    ) -> Result<SubmissionReply, FormClientError> {
        response.validate().map_err(FormClientError::Invalid)?;
        self.send(response).await
    }

    /// Posts a validated response.
    async fn send(&self, response: &SurveyResponse) -> Result<SubmissionReply, FormClientError> {
        let http_response = self
            .client
            .post(self.url.clone())
            .json(response)
            .send()
            .await
            .map_err(|err| FormClientError::Transport(err.to_string()))?;
        let status = http_response.status().as_u16();
        let body = read_response_body_with_limit(http_response, MAX_FORM_RESPONSE_BYTES).await?;
        Ok(SubmissionReply {
            status,
            outcome: SubmissionOutcome::from_status(status),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Returns the localized label for a form field.
#[must_use]
pub fn field_label(field: FieldName) -> String {
    match field {
        FieldName::Name => t!("form.field.name"),
        FieldName::Email => t!("form.field.email"),
        FieldName::Age => t!("form.field.age"),
        FieldName::PhoneNumber => t!("form.field.phone_number"),
        FieldName::Occupation => t!("form.field.occupation"),
        FieldName::Hobby => t!("form.field.hobby"),
        FieldName::PreferredContactMethod => t!("form.field.preferred_contact_method"),
        FieldName::Feedback => t!("form.field.feedback"),
    }
}

/// Returns the localized label for a contact method option.
#[must_use]
pub fn contact_label(method: ContactMethod) -> String {
    match method {
        ContactMethod::Email => t!("form.contact.email"),
        ContactMethod::Phone => t!("form.contact.phone"),
    }
}

/// Renders validation failures as labeled output lines.
#[must_use]
pub fn describe_field_errors(errors: &FieldErrors) -> Vec<String> {
    errors
        .iter()
        .map(|error| match error.field {
            Some(field) => {
                t!("submit.invalid.field", field = field_label(field), message = error.message)
            }
            None => t!("submit.invalid.form", message = error.message),
        })
        .collect()
}

// ============================================================================
// SECTION: HTTP Helpers
// ============================================================================

/// Resolves the form URL from a base URL or a full form URL.
///
/// # Errors
///
/// Returns [`FormClientError::Config`] for unparsable or non-HTTP endpoints.
pub fn resolve_form_url(endpoint: &str) -> Result<Url, FormClientError> {
    let mut url = Url::parse(endpoint.trim())
        .map_err(|err| FormClientError::Config(format!("invalid endpoint url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(FormClientError::Config(format!(
            "unsupported endpoint scheme: {}",
            url.scheme()
        )));
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(FORM_ROUTE);
    }
    Ok(url)
}

/// Reads an HTTP response body while enforcing a hard byte limit.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FormClientError> {
    let mut body = Vec::new();
    let mut total: usize = 0;
    while let Some(chunk) =
        response.chunk().await.map_err(|err| FormClientError::Transport(err.to_string()))?
    {
        let next_total =
            total.checked_add(chunk.len()).ok_or(FormClientError::ResponseTooLarge {
                actual: usize::MAX,
                limit,
            })?;
        if next_total > limit {
            return Err(FormClientError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
        total = next_total;
    }
    Ok(body)
}
