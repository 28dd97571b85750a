//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::DATE_TIME_FORMAT;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal sequential identifier
    pub id: i32,
    /// External identifier used in URLs, never changes
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether email ownership has been confirmed
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Confirm email ownership, keeping the first confirmation time
    pub fn mark_verified(&mut self) {
        if self.email_verified_at.is_none() {
            let now = Utc::now();
            self.email_verified_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Apply profile changes; the hash is replaced only when one is given
    pub fn apply(&mut self, name: String, email: String, password_hash: Option<String>) {
        self.name = name;
        self.email = email;
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
    }
}

/// Record ready to be inserted; identifiers and timestamps are assigned by storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User creation input (plain text password, hashed by the service)
#[derive(Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// User update input; `password: None` keeps the stored hash
#[derive(Clone, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Row of the user listing (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub uuid: Uuid,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    /// `YYYY-MM-DD HH:MM:SS`, null until the email is confirmed
    #[schema(example = "2024-01-01 12:00:00")]
    pub email_verified_at: Option<String>,
    #[schema(example = "2024-01-01 12:00:00")]
    pub created_at: String,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            uuid: user.uuid,
            name: user.name,
            email: user.email,
            email_verified_at: user
                .email_verified_at
                .map(|at| at.format(DATE_TIME_FORMAT).to_string()),
            created_at: user.created_at.format(DATE_TIME_FORMAT).to_string(),
        }
    }
}
