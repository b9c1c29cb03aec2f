pub mod auth_validation;
pub mod authentication;
pub mod clock;
pub mod config;
pub mod email;
pub mod hashing;
pub mod persistence;

pub use auth_validation::{BearerAuthError, BearerTokenValidator};
pub use authentication::{JwtTokenService, TokenConfig, TokenConfigError};
pub use clock::{ManualClock, SystemClock};
pub use email::{LogEmailClient, MockEmailClient, PostmarkEmailClient, SentCode};
pub use hashing::{Argon2PasswordHasher, HashingParams};
pub use persistence::{
    HashMapCodeStore, HashMapCredentialStore, PostgresCodeStore, PostgresCredentialStore,
};
