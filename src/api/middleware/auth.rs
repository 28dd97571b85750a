//! Session authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::api::AppState;
use crate::config::SESSION_COOKIE;
use crate::domain::Actor;
use crate::errors::AppError;

/// Session authentication middleware.
///
/// Reads the session cookie, resolves the signed-in user and injects the
/// [`Actor`] into the request extensions. Guests are sent to the login
/// page, unverified users to the verification notice.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::AuthenticationRequired)?;

    let claims = state
        .auth_service
        .verify_token(&token)
        .map_err(|_| AppError::AuthenticationRequired)?;

    let user = match state.user_service.find(claims.sub).await {
        Ok(user) => user,
        Err(AppError::NotFound) => return Err(AppError::AuthenticationRequired),
        Err(e) => return Err(e),
    };

    if !user.is_verified() {
        return Err(AppError::EmailNotVerified);
    }

    request.extensions_mut().insert(Actor::from(&user));

    Ok(next.run(request).await)
}

/// Signed-in actor for routes outside the guard, if the cookie is valid.
pub async fn current_actor(state: &AppState, jar: &CookieJar) -> Option<Actor> {
    let token = jar.get(SESSION_COOKIE)?;
    let claims = state.auth_service.verify_token(token.value()).ok()?;
    let user = state.user_service.find(claims.sub).await.ok()?;
    Some(Actor::from(&user))
}
