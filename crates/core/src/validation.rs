//! Input validation for the forms that reach the service.
//!
//! Inputs derive [`Validate`]; [`validate_input`] flattens the field errors
//! into a single [`CoreError::Validation`] message so handlers can reject the
//! request before anything reaches storage.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::roles::RoleKind;
use crate::types::RecordId;
use crate::visitor::Gender;

/// Message shown when the gate form is missing its mandatory fields.
pub const MISSING_REQUIRED_FIELDS: &str = "Please fill in all required fields";

/// Gate entry form filled in by a security guard.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VisitorEntry {
    #[validate(custom(function = "not_blank", message = "Please fill in all required fields"))]
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    pub id_proof: Option<String>,
    pub coming_from: Option<String>,
    pub purpose: Option<String>,
    #[validate(custom(function = "valid_contact_number"))]
    pub contact_number: Option<String>,
    #[validate(custom(function = "not_blank", message = "Please fill in all required fields"))]
    pub resident_id: RecordId,
    /// Encoded still from the gate camera, as a data URI.
    pub photo: Option<String>,
    /// Resident pre-approval being redeemed by this entry.
    #[serde(default)]
    pub pre_approval_id: Option<RecordId>,
}

/// Self-registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(
        length(min = 3, max = 32, message = "Login name must be 3 to 32 characters"),
        custom(function = "valid_login_name")
    )]
    pub login_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub password: String,
    pub role: RoleKind,
    pub society_id: Option<RecordId>,
    pub block: Option<String>,
    pub flat_number: Option<String>,
}

/// Run derive-based validation and map failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errs| CoreError::Validation(describe(&errs)))
}

/// Collapse field errors into one sorted, de-duplicated message.
fn describe(errs: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errs
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            list.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Blank counts as no number given.
fn valid_contact_number(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) || digits.len() > 15 {
        let mut err = ValidationError::new("contact_number");
        err.message = Some("Contact number must contain up to 15 digits".into());
        return Err(err);
    }
    Ok(())
}

fn valid_login_name(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
    if !ok {
        let mut err = ValidationError::new("login_name");
        err.message =
            Some("Login name may only contain letters, digits, '.', '_' and '-'".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, resident_id: &str) -> VisitorEntry {
        VisitorEntry {
            name: name.to_string(),
            gender: Gender::Male,
            id_proof: None,
            coming_from: None,
            purpose: None,
            contact_number: None,
            resident_id: resident_id.to_string(),
            photo: None,
            pre_approval_id: None,
        }
    }

    #[test]
    fn complete_entry_passes() {
        assert!(validate_input(&entry("Ravi", "r-1")).is_ok());
    }

    #[test]
    fn missing_name_reports_required_fields() {
        let err = validate_input(&entry("  ", "r-1")).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Validation failed: {MISSING_REQUIRED_FIELDS}")
        );
    }

    #[test]
    fn missing_resident_and_name_reported_once() {
        let err = validate_input(&entry("", "")).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Validation failed: {MISSING_REQUIRED_FIELDS}")
        );
    }

    #[test]
    fn contact_number_must_be_digits() {
        let mut input = entry("Ravi", "r-1");
        input.contact_number = Some("98-76".into());
        assert!(validate_input(&input).is_err());
        input.contact_number = Some("+919876543210".into());
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn blank_contact_number_is_treated_as_absent() {
        let mut input = entry("Ravi", "r-1");
        input.contact_number = Some(String::new());
        assert!(validate_input(&input).is_ok());
        input.contact_number = Some("   ".into());
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn entry_deserializes_camel_case_with_default_gender() {
        let input: VisitorEntry = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "residentId": "r-9",
            "comingFrom": "Courier"
        }))
        .unwrap();
        assert_eq!(input.gender, Gender::Male);
        assert_eq!(input.coming_from.as_deref(), Some("Courier"));
    }

    #[test]
    fn registration_rejects_bad_email_and_login() {
        let reg = Registration {
            name: "Meera".into(),
            email: "not-an-email".into(),
            login_name: "me era".into(),
            password: "longenough".into(),
            role: RoleKind::Resident,
            society_id: Some("s-1".into()),
            block: None,
            flat_number: None,
        };
        let msg = validate_input(&reg).unwrap_err().to_string();
        assert!(msg.contains("valid email"));
        assert!(msg.contains("Login name may only contain"));
    }
}
