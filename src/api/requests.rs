//! Form requests: the shape rules each submission must satisfy.
//!
//! Bodies are normalized before validation: text fields are trimmed and
//! empty values count as missing. Passwords are never trimmed.

use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::{CreateUser, UpdateUser};
use crate::validation::FieldErrors;

/// Message reported on `password` when the confirmation differs.
pub const PASSWORD_NOT_CONFIRMED: &str = "The password field confirmation does not match.";

/// A submission with field rules (`validator` derive) plus cleanup and
/// rules spanning several fields.
pub trait FormRequest: Validate + Sized {
    /// Cleanup applied before any rule runs.
    fn normalize(self) -> Self;

    /// Rules involving more than one field, run after the field rules.
    fn after(&self, _errors: &mut FieldErrors) {}

    /// Run every rule, collecting all failures per field.
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        self.after(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secret(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `password` must equal `password_confirmation`; skipped when no password is given.
fn confirmed(password: &Option<String>, confirmation: &Option<String>, errors: &mut FieldErrors) {
    if password.is_some() && password != confirmation {
        errors.add("password", PASSWORD_NOT_CONFIRMED);
    }
}

/// Create user request
#[derive(Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct StoreUserRequest {
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    #[schema(example = "john@example.com")]
    pub email: Option<String>,
    #[validate(
        required(message = "The password field is required."),
        length(min = 8, message = "The password field must be at least 8 characters.")
    )]
    #[schema(example = "password123", min_length = 8)]
    pub password: Option<String>,
    #[schema(example = "password123")]
    pub password_confirmation: Option<String>,
}

impl FormRequest for StoreUserRequest {
    fn normalize(self) -> Self {
        Self {
            name: text(self.name),
            email: text(self.email),
            password: secret(self.password),
            password_confirmation: secret(self.password_confirmation),
        }
    }

    fn after(&self, errors: &mut FieldErrors) {
        confirmed(&self.password, &self.password_confirmation, errors);
    }
}

impl From<StoreUserRequest> for CreateUser {
    fn from(request: StoreUserRequest) -> Self {
        Self {
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        }
    }
}

/// Update user request; leave `password` out to keep the current one
#[derive(Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(
        required(message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    #[schema(example = "Jane Smith")]
    pub name: Option<String>,
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    #[schema(example = "jane.smith@example.com")]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "The password field must be at least 8 characters."))]
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl FormRequest for UpdateUserRequest {
    fn normalize(self) -> Self {
        Self {
            name: text(self.name),
            email: text(self.email),
            password: secret(self.password),
            password_confirmation: secret(self.password_confirmation),
        }
    }

    fn after(&self, errors: &mut FieldErrors) {
        confirmed(&self.password, &self.password_confirmation, errors);
    }
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password,
        }
    }
}

fn parse_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|raw| Uuid::parse_str(raw).ok())
}

fn valid_uuids(uuids: &[Value]) -> Result<(), ValidationError> {
    if uuids.iter().all(|value| parse_uuid(value).is_some()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("uuid");
        error.message = Some(Cow::Borrowed(
            "The uuids field must contain valid identifiers.",
        ));
        Err(error)
    }
}

/// Bulk delete request
///
/// Entries are taken as any JSON value so a number or `null` is reported
/// as a field error rather than a malformed body.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct BulkDeleteUsersRequest {
    #[validate(
        length(min = 1, message = "The uuids field is required."),
        custom(function = valid_uuids)
    )]
    #[schema(value_type = Vec<String>)]
    pub uuids: Vec<Value>,
}

impl FormRequest for BulkDeleteUsersRequest {
    fn normalize(self) -> Self {
        Self {
            uuids: self
                .uuids
                .into_iter()
                .map(|value| match value {
                    Value::String(raw) => Value::String(raw.trim().to_string()),
                    other => other,
                })
                .collect(),
        }
    }
}

impl BulkDeleteUsersRequest {
    /// Parsed identifiers (call after validation)
    pub fn uuids(&self) -> Vec<Uuid> {
        self.uuids.iter().filter_map(parse_uuid).collect()
    }
}

/// Login request
#[derive(Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,
    #[validate(required(message = "The password field is required."))]
    pub password: Option<String>,
}

impl FormRequest for LoginRequest {
    fn normalize(self) -> Self {
        Self {
            email: text(self.email),
            password: secret(self.password),
        }
    }
}
