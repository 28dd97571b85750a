//! User Admin - user administration behind a session login
//!
//! Lists, creates, updates and deletes user accounts. Mutations answer
//! with a redirect and a one-shot flash; reads answer with page objects.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core entities (user, actor, password)
//! - **validation**: Field error collection and store-backed rules
//! - **services**: Use cases (user directory, authentication)
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Create and verify the first account, then start the server
//! user-admin users create --name Admin --email admin@example.com --password secret123 --verified
//! user-admin serve
//!
//! # Run migrations
//! user-admin migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod validation;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, User};
pub use errors::{AppError, AppResult};
