//! One-shot flash messages and the redirect-back contract for forms.
//!
//! A mutation answers with a redirect; what happened travels in the
//! `flash` cookie and is consumed by the next page render.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::REFERER, request::Parts, HeaderMap, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::config::{FLASH_COOKIE, USERS_PATH};
use crate::errors::{AppError, AppResult};
use crate::validation::FieldErrors;

/// Payload carried across exactly one redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: Some(message.into()),
            errors: FieldErrors::new(),
        }
    }

    pub fn errors(errors: FieldErrors) -> Self {
        Self {
            success: None,
            errors,
        }
    }

    /// Cookie-safe encoding of the payload.
    pub fn encode(&self) -> AppResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| AppError::internal(format!("Flash encode failed: {}", e)))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode a cookie value; anything unreadable counts as no flash.
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Read the flash and remove it from the jar.
    pub fn take(jar: CookieJar) -> (CookieJar, Self) {
        let flash = jar
            .get(FLASH_COOKIE)
            .and_then(|cookie| Self::decode(cookie.value()))
            .unwrap_or_default();
        let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
        (jar, flash)
    }

    /// Put the flash into the jar for the next request.
    pub fn store(&self, jar: CookieJar) -> CookieJar {
        match self.encode() {
            Ok(value) => jar.add(
                Cookie::build((FLASH_COOKIE, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax),
            ),
            Err(e) => {
                tracing::error!(error = %e, "dropping flash message");
                jar
            }
        }
    }
}

/// Redirect to `to`, flashing a success message.
pub fn redirect_with_success(
    jar: CookieJar,
    to: &str,
    message: impl Into<String>,
) -> (CookieJar, Redirect) {
    (Flash::success(message).store(jar), Redirect::to(to))
}

/// Local path the request came from, taken from `Referer`.
///
/// Only the path and query are kept, so a redirect can never leave the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Back(pub String);

impl Back {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let path = headers
            .get(REFERER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Uri>().ok())
            .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_string()))
            .filter(|path| path.starts_with('/') && !path.starts_with("//"))
            .unwrap_or_else(|| USERS_PATH.to_string());
        Self(path)
    }

    /// Turn an error into the form response: field errors go back to the
    /// form, everything else is answered as is.
    pub fn reject(&self, err: AppError) -> FormError {
        match err {
            AppError::Validation(errors) => FormError::Invalid {
                back: self.0.clone(),
                errors,
            },
            other => FormError::Failed(other),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Back
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Failure of a form submission.
#[derive(Debug)]
pub enum FormError {
    /// Input rejected; redirect back with the field errors flashed
    Invalid { back: String, errors: FieldErrors },
    /// Anything else keeps its normal error response
    Failed(AppError),
}

impl From<AppError> for FormError {
    fn from(err: AppError) -> Self {
        FormError::Failed(err)
    }
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        match self {
            FormError::Invalid { back, errors } => {
                tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "form rejected");
                let jar = Flash::errors(errors).store(CookieJar::new());
                (jar, Redirect::to(&back)).into_response()
            }
            FormError::Failed(err) => err.into_response(),
        }
    }
}

/// Attach the redirect-back target to a service result.
pub trait OrBack<T> {
    fn or_back(self, back: &Back) -> Result<T, FormError>;
}

impl<T> OrBack<T> for AppResult<T> {
    fn or_back(self, back: &Back) -> Result<T, FormError> {
        self.map_err(|err| back.reject(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, HeaderValue, StatusCode};

    #[test]
    fn decode_reads_what_encode_wrote() {
        let mut errors = FieldErrors::single("email", "The email has already been taken.");
        errors.add("name", "The name field is required.");
        let flash = Flash::errors(errors);

        assert_eq!(Flash::decode(&flash.encode().unwrap()), Some(flash));
    }

    #[test]
    fn decode_tolerates_garbage() {
        assert_eq!(Flash::decode("%%%"), None);
        assert_eq!(Flash::decode(&URL_SAFE_NO_PAD.encode("not json")), None);
    }

    #[test]
    fn back_keeps_only_local_path() {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("https://evil.example/users?page=2"));
        assert_eq!(Back::from_headers(&headers).0, "/users?page=2");

        headers.insert(REFERER, HeaderValue::from_static("//evil.example"));
        assert_eq!(Back::from_headers(&headers).0, USERS_PATH);

        assert_eq!(Back::from_headers(&HeaderMap::new()).0, USERS_PATH);
    }

    #[test]
    fn invalid_form_redirects_back_with_errors() {
        let back = Back("/users".to_string());
        let response = back
            .reject(AppError::invalid("name", "The name field is required."))
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/users");
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("flash="));
    }

    #[test]
    fn other_failures_keep_their_status() {
        let response = Back("/users".to_string())
            .reject(AppError::NotFound)
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
