//! Field-level validation errors and the rules the service enforces.
//!
//! Form shape rules are declared on the request structs with `validator`.
//! The service repeats the name and email rules through [`profile`] so the
//! CLI cannot store what a form would reject. Rules that consult existing
//! records, such as email uniqueness, also live here.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Message reported when an email belongs to another record.
pub const EMAIL_TAKEN: &str = "The email has already been taken.";

const MAX_LENGTH: usize = 255;

/// Map of field name to the messages describing what is wrong with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors holding a single message for one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the fields.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }

    /// Field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field));
                fields.add(field.to_string(), message);
            }
        }
        fields
    }
}

fn required_text(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("The {} field is required.", field));
        false
    } else {
        if value.chars().count() > MAX_LENGTH {
            errors.add(
                field,
                format!("The {} field must not be greater than {} characters.", field, MAX_LENGTH),
            );
        }
        true
    }
}

/// Shape rules every stored user satisfies, whatever the entry point.
pub fn profile(name: &str, email: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    required_text(&mut errors, "name", name);
    if required_text(&mut errors, "email", email) && !email.validate_email() {
        errors.add("email", "The email field must be a valid email address.");
    }
    errors
}

/// Check that `email` is not used by any record other than `ignore`.
pub async fn unique_email(
    users: &dyn UserRepository,
    email: &str,
    ignore: Option<Uuid>,
) -> AppResult<()> {
    match users.find_by_email(email).await? {
        Some(existing) if Some(existing.uuid) != ignore => {
            Err(AppError::Validation(FieldErrors::single("email", EMAIL_TAKEN)))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "The name field is required."))]
        name: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn converts_validator_errors_with_fallback_message() {
        let probe = Probe {
            name: String::new(),
            email: "nope".to_string(),
        };
        let errors = FieldErrors::from(probe.validate().unwrap_err());

        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(errors.get("email").unwrap(), ["The email field is invalid."]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["email", "name"]);
    }

    #[test]
    fn add_appends_messages_per_field() {
        let mut errors = FieldErrors::single("email", "first");
        errors.add("email", "second");
        errors.add("name", "third");

        assert_eq!(errors.get("email").unwrap(), ["first", "second"]);
        assert!(errors.contains("name"));
        assert_eq!(errors.to_string(), "first second third");
    }

    #[test]
    fn profile_reports_blank_and_malformed_fields() {
        let errors = profile("  ", "not-an-email");

        assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
        assert_eq!(
            errors.get("email").unwrap(),
            ["The email field must be a valid email address."]
        );
        assert!(errors.clone().into_result().is_err());
    }

    #[test]
    fn profile_limits_length() {
        let long = "a".repeat(256);
        let errors = profile(&long, "jane@example.com");

        assert_eq!(
            errors.get("name").unwrap(),
            ["The name field must not be greater than 255 characters."]
        );
        assert!(profile("Jane", "jane@example.com").into_result().is_ok());
    }

    #[test]
    fn serializes_as_plain_map() {
        let errors = FieldErrors::single("password", "too short");
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({ "password": ["too short"] }));
    }
}
