pub mod bearer_token_validator;

pub use bearer_token_validator::{BearerAuthError, BearerTokenValidator};
