//! Service Container - Centralized service access.
//!
//! Wires the repository into every service once, so handlers and
//! commands share the same instances.

use std::sync::Arc;

use super::{AuthService, Authenticator, UserManager, UserService};
use crate::config::Config;
use crate::infra::{UserRepository, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create service container over any user repository
    pub fn from_repository(users: Arc<dyn UserRepository>, config: Config) -> Self {
        let auth_service = Arc::new(Authenticator::new(users.clone(), config));
        let user_service = Arc::new(UserManager::new(users));

        Self {
            auth_service,
            user_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_repository(Arc::new(UserStore::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Actor;
    use crate::infra::MockUserRepository;

    #[tokio::test]
    async fn services_share_one_repository() {
        let mut repo = MockUserRepository::new();
        repo.expect_list_latest().times(1).returning(|| Ok(vec![]));

        let config = Config::new("sqlite::memory:", "test-secret-key-for-testing-only-32chars")
            .unwrap();
        let services = Services::from_repository(Arc::new(repo), config);

        assert!(services.users().list(&Actor::console()).await.unwrap().is_empty());
    }
}
