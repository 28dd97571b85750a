//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod actor;
pub mod password;
pub mod user;

pub use actor::Actor;
pub use password::Password;
pub use user::{CreateUser, NewUser, UpdateUser, User, UserListItem};
