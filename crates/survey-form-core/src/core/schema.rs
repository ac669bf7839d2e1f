// crates/survey-form-core/src/core/schema.rs
// ============================================================================
// Module: Survey Validation Schema
// Description: Field constraints and validation for survey submissions.
// Purpose: Turn untrusted JSON into a typed response or a full error list.
// Dependencies: regex, serde, serde_json
// ============================================================================

//! ## Overview
//! The schema is the single rule set shared by the form client and the
//! submission endpoint. [`validate_submission`] checks every field of an
//! untrusted JSON object and either returns a normalized [`SurveyResponse`]
//! or a [`FieldErrors`] list holding every failed check. Acceptance is
//! all-or-nothing.
//!
//! Per-field validators are public so interactive clients can check each
//! answer as it is entered.
//! Security posture: candidate payloads are untrusted; messages never echo
//! submitted values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::response::ContactMethod;
use crate::core::response::SurveyResponse;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Minimum length (in UTF-16 code units) for free-text fields.
pub const MIN_TEXT_CHARS: usize = 3;
/// Maximum length (in UTF-16 code units) for free-text fields.
pub const MAX_TEXT_CHARS: usize = 50;
/// Minimum accepted age.
pub const MIN_AGE: u8 = 1;
/// Maximum accepted age.
pub const MAX_AGE: u8 = 99;
/// Exact number of digits in a phone number.
pub const PHONE_NUMBER_DIGITS: usize = 10;

// ============================================================================
// SECTION: Messages
// ============================================================================

/// Message for a missing field.
pub const MSG_REQUIRED: &str = "Required";
/// Message for names that end in a digit or span lines.
pub const MSG_NAME_NUMBERS: &str = "Numbers are not allowed";
/// Message for names below the minimum length.
pub const MSG_NAME_TOO_SHORT: &str = "Name must be at least 3 characters long";
/// Message for names above the maximum length.
pub const MSG_NAME_TOO_LONG: &str = "Name must be at most 50 characters long";
/// Message for malformed email addresses.
pub const MSG_INVALID_EMAIL: &str = "Invalid email";
/// Message for fractional ages.
pub const MSG_AGE_NOT_INTEGER: &str = "Expected integer, received float";
/// Message for ages that are zero or negative.
pub const MSG_AGE_NOT_POSITIVE: &str = "Age must be a positive number";
/// Message for ages below [`MIN_AGE`].
pub const MSG_AGE_TOO_SMALL: &str = "Number must be greater than or equal to 1";
/// Message for ages above [`MAX_AGE`].
pub const MSG_AGE_TOO_LARGE: &str = "Age must be at most 99";
/// Message for phone numbers that are not ten digits.
pub const MSG_PHONE_NUMBER: &str = "Phone number must be 10 digits long";
/// Message for occupations below the minimum length.
pub const MSG_OCCUPATION_TOO_SHORT: &str = "Occupation must be at least 3 characters long";
/// Message for occupations above the maximum length.
pub const MSG_OCCUPATION_TOO_LONG: &str = "Occupation must be at most 50 characters long";
/// Message for hobbies below the minimum length.
pub const MSG_HOBBY_TOO_SHORT: &str = "Hobby must be at least 3 characters long";
/// Message for hobbies above the maximum length.
pub const MSG_HOBBY_TOO_LONG: &str = "Hobby must be at most 50 characters long";
/// Message for any invalid contact method.
pub const MSG_CONTACT_METHOD: &str = "Preferred contact method must be either Email or Phone";
/// Message for feedback below the minimum length.
pub const MSG_FEEDBACK_TOO_SHORT: &str = "Feedback must be at least 3 characters long";
/// Message for feedback above the maximum length.
pub const MSG_FEEDBACK_TOO_LONG: &str = "Feedback must be at most 50 characters long";

// ============================================================================
// SECTION: Field Names
// ============================================================================

/// Schema field identifiers.
///
/// # Invariants
/// - Serialized names match the wire payload keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    /// `name`
    Name,
    /// `email`
    Email,
    /// `age`
    Age,
    /// `phoneNumber`
    PhoneNumber,
    /// `occupation`
    Occupation,
    /// `hobby`
    Hobby,
    /// `preferredContactMethod`
    PreferredContactMethod,
    /// `feedback`
    Feedback,
}

impl FieldName {
    /// Every schema field in form order.
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::Email,
        Self::Age,
        Self::PhoneNumber,
        Self::Occupation,
        Self::Hobby,
        Self::PreferredContactMethod,
        Self::Feedback,
    ];

    /// Returns the wire key for the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::PhoneNumber => "phoneNumber",
            Self::Occupation => "occupation",
            Self::Hobby => "hobby",
            Self::PreferredContactMethod => "preferredContactMethod",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// One failed schema check.
///
/// # Invariants
/// - `field` is `None` only for form-level failures (body is not an object).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field the check applies to.
    pub field: Option<FieldName>,
    /// Human-readable failure message.
    pub message: String,
}

impl FieldError {
    /// Builds a field-level error.
    #[must_use]
    pub fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: Some(field),
            message: message.into(),
        }
    }

    /// Builds a form-level error.
    #[must_use]
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Ordered collection of schema failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Creates an empty error list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an error.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Returns true when no checks failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of failed checks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the failures in check order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Returns the distinct fields that failed, in form order.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldName> {
        let mut fields: Vec<FieldName> = self.0.iter().filter_map(|error| error.field).collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }

    /// Returns the messages recorded for one field.
    #[must_use]
    pub fn messages_for(&self, field: FieldName) -> Vec<&str> {
        self.0
            .iter()
            .filter(|error| error.field == Some(field))
            .map(|error| error.message.as_str())
            .collect()
    }

    /// Returns every message without field prefixes.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|error| error.message.as_str()).collect()
    }

    /// Pushes one error per message for `field`.
    fn extend_field(&mut self, field: FieldName, messages: Vec<&'static str>) {
        for message in messages {
            self.push(FieldError::new(field, message));
        }
    }

    /// Converts a single-field message list into a result.
    fn from_field(field: FieldName, messages: Vec<&'static str>) -> Result<(), Self> {
        if messages.is_empty() {
            return Ok(());
        }
        let mut errors = Self::new();
        errors.extend_field(field, messages);
        Err(errors)
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type IntoIter = std::slice::Iter<'a, FieldError>;
    type Item = &'a FieldError;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// ============================================================================
// SECTION: Submission Validation
// ============================================================================

/// Validates an untrusted JSON candidate against the survey schema.
///
/// Unknown keys are ignored. Every field is checked even after an earlier
/// field fails, so the error list is complete.
///
/// # Errors
///
/// Returns [`FieldErrors`] with every failed check when any rule fails.
pub fn validate_submission(candidate: &Value) -> Result<SurveyResponse, FieldErrors> {
    let Some(object) = candidate.as_object() else {
        let mut errors = FieldErrors::new();
        errors.push(FieldError::form(format!(
            "Expected object, received {}",
            json_type_name(candidate)
        )));
        return Err(errors);
    };

    let mut errors = FieldErrors::new();
    let name = text_field(object, FieldName::Name, name_issues, &mut errors);
    let email = text_field(object, FieldName::Email, email_issues, &mut errors);
    let age = age_field(object, &mut errors);
    let phone_number = text_field(object, FieldName::PhoneNumber, phone_issues, &mut errors);
    let occupation = text_field(object, FieldName::Occupation, occupation_issues, &mut errors);
    let hobby = text_field(object, FieldName::Hobby, hobby_issues, &mut errors);
    let preferred_contact_method = contact_method_field(object, &mut errors);
    let feedback = text_field(object, FieldName::Feedback, feedback_issues, &mut errors);

    match (name, email, age, phone_number, occupation, hobby, preferred_contact_method, feedback) {
        (
            Some(name),
            Some(email),
            Some(age),
            Some(phone_number),
            Some(occupation),
            Some(hobby),
            Some(preferred_contact_method),
            Some(feedback),
        ) if errors.is_empty() => Ok(SurveyResponse {
            name,
            email,
            age,
            phone_number,
            occupation,
            hobby,
            preferred_contact_method,
            feedback,
        }),
        _ => Err(errors),
    }
}

impl SurveyResponse {
    /// Re-checks an already typed response against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] when any field violates its rules.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.extend_field(FieldName::Name, name_issues(&self.name));
        errors.extend_field(FieldName::Email, email_issues(&self.email));
        errors.extend_field(FieldName::Age, age_issues(f64::from(self.age)));
        errors.extend_field(FieldName::PhoneNumber, phone_issues(&self.phone_number));
        errors.extend_field(FieldName::Occupation, occupation_issues(&self.occupation));
        errors.extend_field(FieldName::Hobby, hobby_issues(&self.hobby));
        errors.extend_field(FieldName::Feedback, feedback_issues(&self.feedback));
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Deserialization runs the full schema, so a typed response never skips it.
impl TryFrom<Value> for SurveyResponse {
    type Error = FieldErrors;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        validate_submission(&value)
    }
}

// ============================================================================
// SECTION: Field Validators
// ============================================================================

/// Validates a respondent name.
///
/// # Errors
///
/// Returns [`FieldErrors`] listing every failed name rule.
pub fn validate_name(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::Name, name_issues(value))
}

/// Validates an email address.
///
/// # Errors
///
/// Returns [`FieldErrors`] when the address is malformed.
pub fn validate_email(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::Email, email_issues(value))
}

/// Validates an age and returns it as an integer.
///
/// Integral floats such as `30.0` are accepted.
///
/// # Errors
///
/// Returns [`FieldErrors`] listing every failed age rule.
pub fn validate_age(value: f64) -> Result<u8, FieldErrors> {
    FieldErrors::from_field(FieldName::Age, age_issues(value))?;
    (MIN_AGE ..= MAX_AGE)
        .find(|candidate| (f64::from(*candidate) - value).abs() < f64::EPSILON)
        .ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.push(FieldError::new(FieldName::Age, MSG_AGE_NOT_INTEGER));
            errors
        })
}

/// Validates a phone number.
///
/// # Errors
///
/// Returns [`FieldErrors`] unless the value is exactly ten ASCII digits.
pub fn validate_phone_number(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::PhoneNumber, phone_issues(value))
}

/// Validates an occupation.
///
/// # Errors
///
/// Returns [`FieldErrors`] when the length is out of range.
pub fn validate_occupation(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::Occupation, occupation_issues(value))
}

/// Validates a hobby.
///
/// # Errors
///
/// Returns [`FieldErrors`] when the length is out of range.
pub fn validate_hobby(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::Hobby, hobby_issues(value))
}

/// Validates feedback text.
///
/// # Errors
///
/// Returns [`FieldErrors`] when the length is out of range.
pub fn validate_feedback(value: &str) -> Result<(), FieldErrors> {
    FieldErrors::from_field(FieldName::Feedback, feedback_issues(value))
}

/// Parses a contact method wire token.
///
/// # Errors
///
/// Returns [`FieldErrors`] unless the token is `EMAIL` or `PHONE`.
pub fn parse_contact_method(token: &str) -> Result<ContactMethod, FieldErrors> {
    ContactMethod::from_token(token).ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.push(FieldError::new(FieldName::PreferredContactMethod, MSG_CONTACT_METHOD));
        errors
    })
}

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Name rules: single line, no trailing digit, bounded length.
fn name_issues(value: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    let multi_line = value.chars().any(is_line_terminator);
    let trailing_digit = value.chars().next_back().is_some_and(|last| last.is_ascii_digit());
    if multi_line || trailing_digit {
        issues.push(MSG_NAME_NUMBERS);
    }
    length_issues(value, MSG_NAME_TOO_SHORT, MSG_NAME_TOO_LONG, &mut issues);
    issues
}

/// Email address shape: restricted local part, dotted domain, alphabetic TLD.
///
/// Leading dots and `..` runs are checked separately in [`email_issues`].
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    )
    .ok()
});

/// Email syntax rule. Fails closed if the pattern is unavailable.
fn email_issues(value: &str) -> Vec<&'static str> {
    let shape_ok = EMAIL_PATTERN.as_ref().is_some_and(|pattern| pattern.is_match(value));
    let valid = shape_ok && !value.starts_with('.') && !value.contains("..");
    if valid { Vec::new() } else { vec![MSG_INVALID_EMAIL] }
}

/// Age rules: integer, positive, and within bounds.
fn age_issues(value: f64) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if !value.is_finite() || value.fract() != 0.0 {
        issues.push(MSG_AGE_NOT_INTEGER);
    }
    if value <= 0.0 || value.is_nan() {
        issues.push(MSG_AGE_NOT_POSITIVE);
    }
    if value < f64::from(MIN_AGE) || value.is_nan() {
        issues.push(MSG_AGE_TOO_SMALL);
    }
    if value > f64::from(MAX_AGE) {
        issues.push(MSG_AGE_TOO_LARGE);
    }
    issues
}

/// Phone rule: exactly ten ASCII digits.
fn phone_issues(value: &str) -> Vec<&'static str> {
    let valid =
        value.len() == PHONE_NUMBER_DIGITS && value.bytes().all(|byte| byte.is_ascii_digit());
    if valid { Vec::new() } else { vec![MSG_PHONE_NUMBER] }
}

/// Occupation length rules.
fn occupation_issues(value: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    length_issues(value, MSG_OCCUPATION_TOO_SHORT, MSG_OCCUPATION_TOO_LONG, &mut issues);
    issues
}

/// Hobby length rules.
fn hobby_issues(value: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    length_issues(value, MSG_HOBBY_TOO_SHORT, MSG_HOBBY_TOO_LONG, &mut issues);
    issues
}

/// Feedback length rules.
fn feedback_issues(value: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    length_issues(value, MSG_FEEDBACK_TOO_SHORT, MSG_FEEDBACK_TOO_LONG, &mut issues);
    issues
}

/// Appends length violations measured in UTF-16 code units.
fn length_issues(
    value: &str,
    too_short: &'static str,
    too_long: &'static str,
    issues: &mut Vec<&'static str>,
) {
    let length = value.encode_utf16().count();
    if length < MIN_TEXT_CHARS {
        issues.push(too_short);
    }
    if length > MAX_TEXT_CHARS {
        issues.push(too_long);
    }
}

/// Line terminators that end a single-line value.
const fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts a string field and applies its rules.
fn text_field(
    object: &Map<String, Value>,
    field: FieldName,
    rules: fn(&str) -> Vec<&'static str>,
    errors: &mut FieldErrors,
) -> Option<String> {
    match object.get(field.as_str()) {
        None => {
            errors.push(FieldError::new(field, MSG_REQUIRED));
            None
        }
        Some(Value::String(text)) => {
            let issues = rules(text);
            if issues.is_empty() {
                Some(text.clone())
            } else {
                errors.extend_field(field, issues);
                None
            }
        }
        Some(other) => {
            errors.push(FieldError::new(
                field,
                format!("Expected string, received {}", json_type_name(other)),
            ));
            None
        }
    }
}

/// Extracts and normalizes the age field.
fn age_field(object: &Map<String, Value>, errors: &mut FieldErrors) -> Option<u8> {
    match object.get(FieldName::Age.as_str()) {
        None => {
            errors.push(FieldError::new(FieldName::Age, MSG_REQUIRED));
            None
        }
        Some(Value::Number(number)) => {
            let Some(value) = number.as_f64() else {
                errors.push(FieldError::new(FieldName::Age, MSG_AGE_NOT_INTEGER));
                return None;
            };
            match validate_age(value) {
                Ok(age) => Some(age),
                Err(age_errors) => {
                    for error in age_errors.0 {
                        errors.push(error);
                    }
                    None
                }
            }
        }
        Some(other) => {
            errors.push(FieldError::new(
                FieldName::Age,
                format!("Expected number, received {}", json_type_name(other)),
            ));
            None
        }
    }
}

/// Extracts the contact method; every failure shares one message.
fn contact_method_field(
    object: &Map<String, Value>,
    errors: &mut FieldErrors,
) -> Option<ContactMethod> {
    let parsed = object
        .get(FieldName::PreferredContactMethod.as_str())
        .and_then(Value::as_str)
        .and_then(ContactMethod::from_token);
    if parsed.is_none() {
        errors.push(FieldError::new(FieldName::PreferredContactMethod, MSG_CONTACT_METHOD));
    }
    parsed
}

/// Returns the JSON type label used in type mismatch messages.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
