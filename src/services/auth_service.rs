//! Authentication service - credential checks and session tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Hash checked when the email is unknown, so both paths cost one Argon2 run.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::new("timing-equalization-only")
        .ok()
        .map(Password::into_string)
});

/// JWT claims payload carried by the session cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// External identifier of the signed-in user
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and return the session token
    async fn login(&self, email: &str, password: &str) -> AppResult<String>;

    /// Sign a session token for a user
    fn issue_token(&self, user: &User) -> AppResult<String>;

    /// Verify a session token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }

    fn lifetime(&self) -> Duration {
        Duration::hours(self.config.session_lifetime_hours)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self.users.find_by_email(email).await?;

        let password_valid = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()).verify(password),
            None => {
                if let Some(hash) = DUMMY_HASH.as_ref() {
                    Password::from_hash(hash.clone()).verify(password);
                }
                false
            }
        };

        match user {
            Some(user) if password_valid => {
                let token = self.issue_token(&user)?;
                tracing::info!(user = %user.uuid, "login succeeded");
                Ok(token)
            }
            _ => {
                tracing::info!("login failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.uuid,
            email: user.email.clone(),
            exp: (now + self.lifetime()).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?;
        Ok(token)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
