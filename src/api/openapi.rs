//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, user_handler};
use crate::api::requests::{
    BulkDeleteUsersRequest, LoginRequest, StoreUserRequest, UpdateUserRequest,
};
use crate::config::SESSION_COOKIE;
use crate::domain::UserListItem;

/// OpenAPI documentation for the user administration module
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Admin",
        version = "0.1.0",
        description = "User administration behind a session login: list, create, update and delete users"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::login_page,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::verify_email_notice,
        // User endpoints
        user_handler::index,
        user_handler::store,
        user_handler::update,
        user_handler::destroy,
        user_handler::bulk_destroy,
    ),
    components(
        schemas(
            UserListItem,
            user_handler::UsersIndex,
            StoreUserRequest,
            UpdateUserRequest,
            BulkDeleteUsersRequest,
            LoginRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session login and logout"),
        (name = "Users", description = "User administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Signed session token set by POST /login",
                ))),
            );
        }
    }
}
