//! Route key for `/users/:user`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::errors::AppError;

/// External identifier of the addressed user.
///
/// A segment that is not a UUID cannot name any user, so it is a 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserKey(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UserKey
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        Uuid::parse_str(raw.trim())
            .map(UserKey)
            .map_err(|_| AppError::NotFound)
    }
}
