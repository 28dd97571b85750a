//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, NotSet, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Records are addressed by their external `uuid`; the internal id never
/// crosses this boundary as a lookup key.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, newest first
    async fn list_latest(&self) -> AppResult<Vec<User>>;

    /// Find user by external identifier
    async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user, assigning identifiers and timestamps.
    /// A duplicate email surfaces as `AppError::Conflict`.
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Persist the mutable fields of an existing user
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Remove one user; `false` when nothing matched
    async fn delete(&self, uuid: Uuid) -> AppResult<bool>;

    /// Remove every user whose uuid is listed, returning how many were removed
    async fn delete_many(&self, uuids: &[Uuid]) -> AppResult<u64>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Unique index violations mean another writer took the email first.
fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(%detail, "unique constraint violated on users");
            AppError::conflict("User")
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list_latest(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Uuid.eq(uuid))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            uuid: Set(Uuid::new_v4()),
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            email_verified_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(write_error)?;
        Ok(User::from(model))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        // uuid and created_at are never rewritten
        let active = ActiveModel {
            id: Unchanged(user.id),
            uuid: Unchanged(user.uuid),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            email_verified_at: Set(user.email_verified_at),
            created_at: Unchanged(user.created_at),
            updated_at: Set(user.updated_at),
        };

        match active.update(&self.db).await {
            Ok(model) => Ok(User::from(model)),
            Err(DbErr::RecordNotUpdated) => Err(AppError::NotFound),
            Err(e) => Err(write_error(e)),
        }
    }

    async fn delete(&self, uuid: Uuid) -> AppResult<bool> {
        let result = UserEntity::delete_many()
            .filter(user::Column::Uuid.eq(uuid))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_many(&self, uuids: &[Uuid]) -> AppResult<u64> {
        if uuids.is_empty() {
            return Ok(0);
        }

        // Single statement, so the removal is atomic
        let result = UserEntity::delete_many()
            .filter(user::Column::Uuid.is_in(uuids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
