//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::api::flash::{Back, FormError};
use crate::api::requests::FormRequest;
use crate::errors::AppError;

/// Validated JSON extractor that normalizes and validates form bodies.
///
/// An empty body counts as `{}`, so every required field is reported
/// instead of a parse error. Rejections redirect back to the form.
///
/// # Example
///
/// ```rust,ignore
/// async fn store(ValidatedJson(payload): ValidatedJson<StoreUserRequest>) {
///     // payload is trimmed and already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + FormRequest,
{
    type Rejection = FormError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let back = Back::from_headers(req.headers());

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let value = parse::<T>(&body)?.normalize();

        value
            .check()
            .map_err(|errors| back.reject(AppError::Validation(errors)))?;

        Ok(ValidatedJson(value))
    }
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Malformed body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::requests::StoreUserRequest;

    #[test]
    fn blank_body_is_an_empty_object() {
        let request: StoreUserRequest = parse(b"  ").unwrap();

        assert!(request.name.is_none());
        assert!(request.check().is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request: StoreUserRequest = parse(br#"{"name":"A","role":"admin"}"#).unwrap();

        assert_eq!(request.name.as_deref(), Some("A"));
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let result = parse::<StoreUserRequest>(b"{not json");

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
