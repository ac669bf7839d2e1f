// crates/survey-form-core/src/core/response.rs
// ============================================================================
// Module: Survey Response Model
// Description: Typed survey response record and its identifiers.
// Purpose: Provide the persisted entity shared by client, server, and stores.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`SurveyResponse`] is the only persisted entity. Instances are produced by
//! the validation schema and are immutable once stored; there is no update or
//! delete path. Wire names use camelCase to match the form payload.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Contact Method
// ============================================================================

/// Preferred channel for contacting the respondent.
///
/// # Invariants
/// - Wire tokens are exactly `EMAIL` and `PHONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactMethod {
    /// Contact by email.
    #[serde(rename = "EMAIL")]
    Email,
    /// Contact by phone.
    #[serde(rename = "PHONE")]
    Phone,
}

impl ContactMethod {
    /// All accepted contact methods in display order.
    pub const ALL: [Self; 2] = [Self::Email, Self::Phone];

    /// Returns the wire token for the contact method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
        }
    }

    /// Parses a wire token. Matching is exact and case-sensitive.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "EMAIL" => Some(Self::Email),
            "PHONE" => Some(Self::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Survey Response
// ============================================================================

/// One validated survey submission.
///
/// # Invariants
/// - Values satisfy every rule in [`crate::core::schema`] when produced by
///   [`crate::core::schema::validate_submission`] or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "serde_json::Value")]
pub struct SurveyResponse {
    /// Respondent name.
    pub name: String,
    /// Respondent email address.
    pub email: String,
    /// Respondent age in years.
    pub age: u8,
    /// Ten digit phone number.
    pub phone_number: String,
    /// Respondent occupation.
    pub occupation: String,
    /// Respondent hobby.
    pub hobby: String,
    /// Preferred contact channel.
    pub preferred_contact_method: ContactMethod,
    /// Free-form feedback.
    pub feedback: String,
}

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Store-assigned identifier for a persisted response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(i64);

impl ResponseId {
    /// Wraps a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
