//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! keeping services free of SeaORM specifics.

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
