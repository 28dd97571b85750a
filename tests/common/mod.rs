//! Shared helpers for integration tests.
//!
//! Every test gets its own application over a fresh in-memory SQLite
//! database with migrations applied.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use user_admin::api::flash::Flash;
use user_admin::api::{create_router, AppState};
use user_admin::config::{Config, FLASH_COOKIE, SESSION_COOKIE};
use user_admin::domain::{Actor, CreateUser, User};
use user_admin::infra::Database;

pub const SECRET: &str = "test-secret-key-for-testing-only-32chars";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn spawn_app() -> TestApp {
    let config = Config::new("sqlite::memory:", SECRET).expect("config");
    let database = Arc::new(Database::connect(&config).await.expect("database"));
    let state = AppState::from_config(database, config);

    TestApp {
        router: create_router(state.clone()),
        state,
    }
}

impl TestApp {
    /// Store a user with the shared test password.
    pub async fn create_user(&self, name: &str, email: &str, verified: bool) -> User {
        let actor = Actor::console();
        let user = self
            .state
            .user_service
            .create(
                &actor,
                CreateUser {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                },
            )
            .await
            .expect("create user");

        if verified {
            self.state
                .user_service
                .mark_email_verified(&actor, email)
                .await
                .expect("verify user")
        } else {
            user
        }
    }

    /// Verified user plus the cookie header that signs them in.
    pub async fn signed_in_admin(&self) -> (User, String) {
        let admin = self.create_user("Admin", "admin@example.com", true).await;
        let cookie = self.session_cookie(&admin);
        (admin, cookie)
    }

    pub fn session_cookie(&self, user: &User) -> String {
        let token = self.state.auth_service.issue_token(user).expect("token");
        format!("{}={}", SESSION_COOKIE, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("response")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }

    /// Send a JSON form submission from the users page.
    pub async fn submit(
        &self,
        method: Method,
        path: &str,
        body: Value,
        cookie: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::REFERER, "http://localhost/users");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).expect("request"))
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let actor = Actor::console();
        self.state
            .user_service
            .list(&actor)
            .await
            .expect("list")
            .into_iter()
            .find(|user| user.email == email)
    }

    pub async fn user_count(&self) -> usize {
        self.state
            .user_service
            .list(&Actor::console())
            .await
            .expect("list")
            .len()
    }
}

/// Assert a 303 to `location` and return the response for further checks.
pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], location);
}

/// Value of a cookie set by the response, if any.
pub fn set_cookie(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&prefix))
        .map(|value| {
            value[prefix.len()..]
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string()
        })
}

/// Flash payload set by the response.
pub fn flash(response: &Response) -> Flash {
    set_cookie(response, FLASH_COOKIE)
        .and_then(|value| Flash::decode(&value))
        .expect("flash cookie")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
