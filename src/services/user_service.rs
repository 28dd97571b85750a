//! User directory service - list, create, update and delete user records.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, CreateUser, NewUser, Password, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;
use crate::validation;

/// User service trait for dependency injection.
///
/// Every mutating operation takes the acting user explicitly.
#[async_trait]
pub trait UserService: Send + Sync {
    /// All users, newest first
    async fn list(&self, actor: &Actor) -> AppResult<Vec<User>>;

    /// Look up a user by external identifier
    async fn find(&self, uuid: Uuid) -> AppResult<User>;

    /// Create a user, hashing the password
    async fn create(&self, actor: &Actor, input: CreateUser) -> AppResult<User>;

    /// Update name and email, and the password only when one is supplied
    async fn update(&self, actor: &Actor, uuid: Uuid, input: UpdateUser) -> AppResult<User>;

    /// Remove a single user
    async fn delete(&self, actor: &Actor, uuid: Uuid) -> AppResult<()>;

    /// Remove all listed users; unknown identifiers are ignored
    async fn bulk_delete(&self, actor: &Actor, uuids: Vec<Uuid>) -> AppResult<u64>;

    /// Record that the owner of `email` confirmed it
    async fn mark_email_verified(&self, actor: &Actor, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService over a repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list(&self, actor: &Actor) -> AppResult<Vec<User>> {
        tracing::debug!(%actor, "listing users");
        self.users.list_latest().await
    }

    async fn find(&self, uuid: Uuid) -> AppResult<User> {
        self.users.find_by_uuid(uuid).await?.ok_or_not_found()
    }

    async fn create(&self, actor: &Actor, input: CreateUser) -> AppResult<User> {
        validation::profile(&input.name, &input.email).into_result()?;
        validation::unique_email(self.users.as_ref(), &input.email, None).await?;

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self
            .users
            .insert(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(%actor, user = %user.uuid, "user created");
        Ok(user)
    }

    async fn update(&self, actor: &Actor, uuid: Uuid, input: UpdateUser) -> AppResult<User> {
        validation::profile(&input.name, &input.email).into_result()?;
        let mut user = self.find(uuid).await?;
        validation::unique_email(self.users.as_ref(), &input.email, Some(uuid)).await?;

        let password_hash = match input.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };
        let rehashed = password_hash.is_some();
        user.apply(input.name, input.email, password_hash);

        let user = self.users.update(&user).await?;
        tracing::info!(%actor, user = %user.uuid, rehashed, "user updated");
        Ok(user)
    }

    async fn delete(&self, actor: &Actor, uuid: Uuid) -> AppResult<()> {
        if !self.users.delete(uuid).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(%actor, user = %uuid, "user deleted");
        Ok(())
    }

    async fn bulk_delete(&self, actor: &Actor, uuids: Vec<Uuid>) -> AppResult<u64> {
        let unique: Vec<Uuid> = uuids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(0);
        }

        let deleted = self.users.delete_many(&unique).await?;
        tracing::info!(%actor, requested = unique.len(), deleted, "users bulk deleted");
        Ok(deleted)
    }

    async fn mark_email_verified(&self, actor: &Actor, email: &str) -> AppResult<User> {
        let mut user = self.users.find_by_email(email).await?.ok_or_not_found()?;
        if user.is_verified() {
            return Ok(user);
        }

        user.mark_verified();
        let user = self.users.update(&user).await?;
        tracing::info!(%actor, user = %user.uuid, "email marked verified");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn stored_user(uuid: Uuid, email: &str) -> User {
        User {
            id: 1,
            uuid,
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password_hash: Password::new("password123").unwrap().into_string(),
            email_verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    fn actor() -> Actor {
        Actor::console()
    }

    #[tokio::test]
    async fn create_hashes_password_before_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("john@example.com"))
            .returning(|_| Ok(None));
        repo.expect_insert()
            .withf(|new| {
                new.name == "John Doe"
                    && new.password_hash != "password123"
                    && Password::from_hash(new.password_hash.clone()).verify("password123")
            })
            .times(1)
            .returning(|new| {
                let mut user = stored_user(Uuid::new_v4(), &new.email);
                user.name = new.name;
                user.password_hash = new.password_hash;
                Ok(user)
            });

        let user = service(repo)
            .create(
                &actor(),
                CreateUser {
                    name: "John Doe".into(),
                    email: "john@example.com".into(),
                    password: "password123".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(user.email, "john@example.com");
    }

    #[tokio::test]
    async fn create_rejects_taken_email_as_field_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(Uuid::new_v4(), email))));
        repo.expect_insert().never();

        let result = service(repo)
            .create(
                &actor(),
                CreateUser {
                    name: "Test User".into(),
                    email: "existing@example.com".into(),
                    password: "password123".into(),
                },
            )
            .await;

        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("email").unwrap(), [validation::EMAIL_TAKEN])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_name_and_malformed_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().never();
        repo.expect_insert().never();

        let result = service(repo)
            .create(
                &actor(),
                CreateUser {
                    name: "".into(),
                    email: "not-an-email".into(),
                    password: "password123".into(),
                },
            )
            .await;

        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("name").unwrap(), ["The name field is required."]);
                assert_eq!(
                    errors.get("email").unwrap(),
                    ["The email field must be a valid email address."]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_rejects_malformed_email_before_loading() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_uuid().never();
        repo.expect_update().never();

        let result = service(repo)
            .update(
                &actor(),
                Uuid::new_v4(),
                UpdateUser {
                    name: "Jane".into(),
                    email: "jane-at-example".into(),
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(e)) if e.contains("email")));
    }

    #[tokio::test]
    async fn create_surfaces_insert_race_as_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_insert()
            .returning(|_| Err(AppError::conflict("User")));

        let result = service(repo)
            .create(
                &actor(),
                CreateUser {
                    name: "Racer".into(),
                    email: "race@example.com".into(),
                    password: "password123".into(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_without_password_keeps_hash() {
        let uuid = Uuid::new_v4();
        let original = stored_user(uuid, "jane@example.com");
        let original_hash = original.password_hash.clone();

        let mut repo = MockUserRepository::new();
        let found = original.clone();
        repo.expect_find_by_uuid()
            .with(eq(uuid))
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_find_by_email().returning(|_| Ok(None));
        let expected_hash = original_hash.clone();
        repo.expect_update()
            .withf(move |user| user.password_hash == expected_hash && user.name == "Jane Smith")
            .times(1)
            .returning(|user| Ok(user.clone()));

        let user = service(repo)
            .update(
                &actor(),
                uuid,
                UpdateUser {
                    name: "Jane Smith".into(),
                    email: "jane.smith@example.com".into(),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(user.password_hash, original_hash);
        assert_eq!(user.email, "jane.smith@example.com");
    }

    #[tokio::test]
    async fn update_allows_keeping_own_email() {
        let uuid = Uuid::new_v4();
        let original = stored_user(uuid, "jane@example.com");

        let mut repo = MockUserRepository::new();
        let found = original.clone();
        repo.expect_find_by_uuid()
            .returning(move |_| Ok(Some(found.clone())));
        let same = original.clone();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(same.clone())));
        repo.expect_update().returning(|user| Ok(user.clone()));

        let result = service(repo)
            .update(
                &actor(),
                uuid,
                UpdateUser {
                    name: "Jane".into(),
                    email: "jane@example.com".into(),
                    password: Some("newpassword123".into()),
                },
            )
            .await;

        let user = result.unwrap();
        assert!(Password::from_hash(user.password_hash).verify("newpassword123"));
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_uuid().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = service(repo)
            .update(
                &actor(),
                Uuid::new_v4(),
                UpdateUser {
                    name: "Ghost".into(),
                    email: "ghost@example.com".into(),
                    password: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));

        let result = service(repo).delete(&actor(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn bulk_delete_dedupes_and_reports_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_delete_many()
            .withf(|uuids: &[Uuid]| uuids.len() == 2)
            .times(1)
            .returning(|_| Ok(1));

        let deleted = service(repo)
            .bulk_delete(&actor(), vec![a, b, a])
            .await
            .unwrap();

        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn bulk_delete_of_nothing_skips_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete_many().never();

        assert_eq!(service(repo).bulk_delete(&actor(), vec![]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mark_email_verified_sets_timestamp_once() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(Uuid::new_v4(), email))));
        repo.expect_update()
            .withf(|user| user.email_verified_at.is_some())
            .times(1)
            .returning(|user| Ok(user.clone()));

        let user = service(repo)
            .mark_email_verified(&actor(), "jane@example.com")
            .await
            .unwrap();

        assert!(user.is_verified());
    }
}
