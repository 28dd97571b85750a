//! Authentication handlers.

use axum::{
    extract::State,
    response::{Json, Redirect},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::extractors::ValidatedJson;
use crate::api::flash::{Back, Flash, FormError};
use crate::api::middleware::current_actor;
use crate::api::page::{NoProps, Page};
use crate::api::requests::LoginRequest;
use crate::api::AppState;
use crate::config::{HOME_PATH, LOGIN_PATH, SESSION_COOKIE, USERS_PATH, VERIFY_EMAIL_PATH};
use crate::errors::AppError;

/// Create public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/verify-email", get(verify_email_notice))
}

/// Show the login form
#[utoipa::path(
    get,
    path = "/login",
    tag = "Authentication",
    responses(
        (status = 200, description = "Auth/Login page")
    )
)]
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Page<NoProps>>) {
    let actor = current_actor(&state, &jar).await;
    let (jar, flash) = Flash::take(jar);

    (
        jar,
        Page::render("Auth/Login", LOGIN_PATH, NoProps {}, actor.as_ref(), flash),
    )
}

/// Sign in and open a session
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 303, description = "Signed in; session cookie set and redirect to /users, or back with field errors")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    back: Back,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Redirect), FormError> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let token = match state.auth_service.login(&email, &password).await {
        Ok(token) => token,
        Err(AppError::InvalidCredentials) => {
            return Err(back.reject(AppError::invalid(
                "email",
                AppError::InvalidCredentials.to_string(),
            )))
        }
        Err(e) => return Err(e.into()),
    };

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Redirect::to(USERS_PATH)))
}

/// Close the session
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    security(("session_cookie" = [])),
    responses(
        (status = 303, description = "Session cookie cleared; redirect to /")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(HOME_PATH))
}

/// Tell a signed-in user their email still needs verification
#[utoipa::path(
    get,
    path = "/verify-email",
    tag = "Authentication",
    responses(
        (status = 200, description = "Auth/VerifyEmail page")
    )
)]
pub async fn verify_email_notice(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Page<NoProps>>) {
    let actor = current_actor(&state, &jar).await;
    let (jar, flash) = Flash::take(jar);

    (
        jar,
        Page::render(
            "Auth/VerifyEmail",
            VERIFY_EMAIL_PATH,
            NoProps {},
            actor.as_ref(),
            flash,
        ),
    )
}
