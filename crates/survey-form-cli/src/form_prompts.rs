// crates/survey-form-cli/src/form_prompts.rs
// ============================================================================
// Module: Form Prompts
// Description: Interactive terminal prompts for each survey field.
// Purpose: Collect a validated survey response one field at a time.
// Dependencies: dialoguer, survey-form-core
// ============================================================================

//! ## Overview
//! Renders one prompt per schema field in form order. Each answer is checked
//! with the same per-field validator the server runs, so the prompt repeats
//! until the value passes. The contact method is offered as a selection.

use dialoguer::Input;
use dialoguer::Select;
use survey_form_cli::form_client::contact_label;
use survey_form_cli::form_client::field_label;
use survey_form_cli::t;
use survey_form_core::ContactMethod;
use survey_form_core::FieldErrors;
use survey_form_core::FieldName;
use survey_form_core::SurveyResponse;
use survey_form_core::core::schema::validate_age;
use survey_form_core::core::schema::validate_email;
use survey_form_core::core::schema::validate_feedback;
use survey_form_core::core::schema::validate_hobby;
use survey_form_core::core::schema::validate_name;
use survey_form_core::core::schema::validate_occupation;
use survey_form_core::core::schema::validate_phone_number;

/// Per-field text validator signature.
type TextValidator = fn(&str) -> Result<(), FieldErrors>;

/// Prompts for every field and returns a response that passes the schema.
///
/// # Errors
///
/// Returns a localized message when the terminal prompt fails.
pub(crate) fn prompt_response() -> Result<SurveyResponse, String> {
    let name = prompt_text(FieldName::Name, validate_name)?;
    let email = prompt_text(FieldName::Email, validate_email)?;
    let age = prompt_age()?;
    let phone_number = prompt_text(FieldName::PhoneNumber, validate_phone_number)?;
    let occupation = prompt_text(FieldName::Occupation, validate_occupation)?;
    let hobby = prompt_text(FieldName::Hobby, validate_hobby)?;
    let preferred_contact_method = prompt_contact_method()?;
    let feedback = prompt_text(FieldName::Feedback, validate_feedback)?;
    Ok(SurveyResponse {
        name,
        email,
        age,
        phone_number,
        occupation,
        hobby,
        preferred_contact_method,
        feedback,
    })
}

/// Prompts for a text field until `validator` accepts it.
fn prompt_text(field: FieldName, validator: TextValidator) -> Result<String, String> {
    Input::<String>::new()
        .with_prompt(field_label(field))
        .validate_with(move |value: &String| -> Result<(), String> {
            validator(value).map_err(|errors| join_messages(&errors))
        })
        .interact_text()
        .map_err(|err| t!("fill.prompt_failed", error = err))
}

/// Prompts for the age until it parses and passes range checks.
fn prompt_age() -> Result<u8, String> {
    let answer = Input::<String>::new()
        .with_prompt(field_label(FieldName::Age))
        .validate_with(|value: &String| -> Result<(), String> {
            parse_age_answer(value).map(|_| ())
        })
        .interact_text()
        .map_err(|err| t!("fill.prompt_failed", error = err))?;
    parse_age_answer(&answer)
}

/// Offers the contact methods as a selection list.
fn prompt_contact_method() -> Result<ContactMethod, String> {
    let labels: Vec<String> =
        ContactMethod::ALL.iter().map(|method| contact_label(*method)).collect();
    let index = Select::new()
        .with_prompt(field_label(FieldName::PreferredContactMethod))
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|err| t!("fill.prompt_failed", error = err))?;
    Ok(ContactMethod::ALL.get(index).copied().unwrap_or(ContactMethod::Email))
}

/// Parses a typed age answer and applies the schema rules.
pub(crate) fn parse_age_answer(answer: &str) -> Result<u8, String> {
    let value: f64 = answer.trim().parse().map_err(|_| t!("fill.age.not_number"))?;
    validate_age(value).map_err(|errors| join_messages(&errors))
}

/// Joins validator messages for inline display.
fn join_messages(errors: &FieldErrors) -> String {
    errors.messages().join("; ")
}
