pub mod auth_service;
pub mod helpers;
pub mod tracing;

pub use auth_service::{AUTH_PATH_PREFIX, AuthService};
