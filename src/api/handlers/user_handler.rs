//! User administration handlers.

use axum::{
    extract::{Extension, State},
    response::{Json, Redirect},
    routing::{get, post, put},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::extractors::{UserKey, ValidatedJson};
use crate::api::flash::{redirect_with_success, Back, Flash, FormError, OrBack};
use crate::api::page::Page;
use crate::api::requests::{BulkDeleteUsersRequest, StoreUserRequest, UpdateUserRequest};
use crate::api::AppState;
use crate::config::USERS_PATH;
use crate::domain::{Actor, UserListItem};
use crate::errors::AppResult;

/// Props of the `Users/Index` page
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersIndex {
    pub users: Vec<UserListItem>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(index).post(store))
        .route("/users/bulk-delete", post(bulk_destroy))
        .route("/users/:user", put(update).delete(destroy))
}

/// List all users, newest first
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Users/Index page", body = UsersIndex),
        (status = 303, description = "Not signed in, redirect to /login")
    )
)]
pub async fn index(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<Page<UsersIndex>>)> {
    let users = state.user_service.list(&actor).await?;
    let (jar, flash) = Flash::take(jar);

    let props = UsersIndex {
        users: users.into_iter().map(UserListItem::from).collect(),
    };

    Ok((
        jar,
        Page::render("Users/Index", USERS_PATH, props, Some(&actor), flash),
    ))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("session_cookie" = [])),
    request_body = StoreUserRequest,
    responses(
        (status = 303, description = "Created; redirect to /users with a success flash, or back with field errors"),
        (status = 409, description = "Email taken concurrently")
    )
)]
pub async fn store(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    jar: CookieJar,
    back: Back,
    ValidatedJson(payload): ValidatedJson<StoreUserRequest>,
) -> Result<(CookieJar, Redirect), FormError> {
    state
        .user_service
        .create(&actor, payload.into())
        .await
        .or_back(&back)?;

    Ok(redirect_with_success(
        jar,
        USERS_PATH,
        "User created successfully.",
    ))
}

/// Update a user; the password changes only when one is supplied
#[utoipa::path(
    put,
    path = "/users/{user}",
    tag = "Users",
    security(("session_cookie" = [])),
    params(
        ("user" = String, Path, description = "User external identifier (UUID)")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 303, description = "Updated; redirect to /users with a success flash, or back with field errors"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email taken concurrently")
    )
)]
pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    UserKey(uuid): UserKey,
    jar: CookieJar,
    back: Back,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Result<(CookieJar, Redirect), FormError> {
    state
        .user_service
        .update(&actor, uuid, payload.into())
        .await
        .or_back(&back)?;

    Ok(redirect_with_success(
        jar,
        USERS_PATH,
        "User updated successfully.",
    ))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{user}",
    tag = "Users",
    security(("session_cookie" = [])),
    params(
        ("user" = String, Path, description = "User external identifier (UUID)")
    ),
    responses(
        (status = 303, description = "Deleted; redirect to /users with a success flash"),
        (status = 404, description = "User not found")
    )
)]
pub async fn destroy(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    UserKey(uuid): UserKey,
    jar: CookieJar,
) -> AppResult<(CookieJar, Redirect)> {
    state.user_service.delete(&actor, uuid).await?;

    Ok(redirect_with_success(
        jar,
        USERS_PATH,
        "User deleted successfully.",
    ))
}

/// Delete several users at once; unknown identifiers are skipped
#[utoipa::path(
    post,
    path = "/users/bulk-delete",
    tag = "Users",
    security(("session_cookie" = [])),
    request_body = BulkDeleteUsersRequest,
    responses(
        (status = 303, description = "Redirect to /users flashing how many users were deleted")
    )
)]
pub async fn bulk_destroy(
    Extension(actor): Extension<Actor>,
    State(state): State<AppState>,
    jar: CookieJar,
    back: Back,
    ValidatedJson(payload): ValidatedJson<BulkDeleteUsersRequest>,
) -> Result<(CookieJar, Redirect), FormError> {
    let deleted = state
        .user_service
        .bulk_delete(&actor, payload.uuids())
        .await
        .or_back(&back)?;

    Ok(redirect_with_success(
        jar,
        USERS_PATH,
        format!("{} user(s) deleted successfully.", deleted),
    ))
}
