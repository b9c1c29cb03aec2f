//! Axum integration for the Imperial identity service.
//!
//! Handlers are thin: they deserialize the body, call into
//! [`imperial_application::AuthWorkflow`] and map the result to a response.
//! Every failure leaves through [`ApiError`], so clients always see the same
//! `{"kind", "message"}` payload.

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

pub use error::ApiError;
pub use extract::JsonBody;
pub use middleware::{AuthenticatedAccount, require_auth};
