use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    account_id::AccountId, email::Email, one_time_code::OneTimeCode, password::Password,
    password_hash::PasswordHash, tokens::TokenPair, user_account::UserAccount,
};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct EmailClientError(pub String);

/// Port trait for outbound code delivery
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_verification_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError>;
    async fn send_password_reset_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError>;
}

#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),
    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, PasswordHasherError>;

    /// Constant-time comparison of `candidate` against `hash`.
    async fn verify(
        &self,
        hash: &PasswordHash,
        candidate: &Password,
    ) -> Result<bool, PasswordHasherError>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong algorithm, wrong token class, expired or
    /// malformed. Deliberately undifferentiated.
    #[error("Invalid token")]
    Invalid,
    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and validates signed access/refresh tokens. Pure CPU work, so
/// synchronous.
pub trait TokenService: Send + Sync {
    fn issue_pair(&self, account: &UserAccount) -> Result<TokenPair, TokenError>;
    fn issue_access_token(&self, account: &UserAccount) -> Result<String, TokenError>;
    fn validate_access_token(&self, token: &str) -> Result<AccountId, TokenError>;
    fn validate_refresh_token(&self, token: &str) -> Result<AccountId, TokenError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
