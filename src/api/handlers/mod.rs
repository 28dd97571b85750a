//! HTTP request handlers.

pub mod auth_handler;
pub mod user_handler;

pub use auth_handler::{auth_routes, logout};
pub use user_handler::user_routes;
