use thiserror::Error;

use crate::{
    domain::{
        email::EmailError, one_time_code::OneTimeCodeError, password::PasswordError,
        password_hash::InvalidPasswordHash, verification_code::CodeRejection,
    },
    ports::{
        repositories::{CodeStoreError, CredentialStoreError},
        services::{EmailClientError, PasswordHasherError, TokenError},
    },
};

/// Coarse classification shared by every auth failure. The HTTP layer maps
/// it to a status code and the `kind` field of error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
    Database,
    External,
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Conflict => 409,
            ErrorKind::NotFound => 404,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Internal | ErrorKind::Database | ErrorKind::External => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Internal => "INTERNAL_ERROR",
            ErrorKind::Database => "DATABASE_ERROR",
            ErrorKind::External => "EXTERNAL_SERVICE_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// Every failure an auth workflow can return.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Email is already verified")]
    AlreadyVerified,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("An account with this email already exists")]
    EmailAlreadyRegistered,
    #[error("Verification code has already been used")]
    CodeAlreadyUsed,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Verification code not found")]
    CodeNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Notification delivery failed: {0}")]
    Notification(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidInput(_) | AuthError::AlreadyVerified | AuthError::CodeExpired => {
                ErrorKind::Validation
            }
            AuthError::EmailAlreadyRegistered | AuthError::CodeAlreadyUsed => ErrorKind::Conflict,
            AuthError::AccountNotFound | AuthError::CodeNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials | AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::Database(_) => ErrorKind::Database,
            AuthError::Internal(_) => ErrorKind::Internal,
            AuthError::Notification(_) => ErrorKind::External,
        }
    }

    /// Message safe to return to a client. Server-side failures keep their
    /// detail in the logs only.
    pub fn client_message(&self) -> String {
        match self.kind() {
            ErrorKind::Database | ErrorKind::Internal => "Unexpected error".to_string(),
            ErrorKind::External => "Failed to deliver notification".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<EmailError> for AuthError {
    fn from(e: EmailError) -> Self {
        AuthError::InvalidInput(e.to_string())
    }
}

impl From<PasswordError> for AuthError {
    fn from(e: PasswordError) -> Self {
        AuthError::InvalidInput(e.to_string())
    }
}

impl From<OneTimeCodeError> for AuthError {
    fn from(e: OneTimeCodeError) -> Self {
        AuthError::InvalidInput(e.to_string())
    }
}

impl From<InvalidPasswordHash> for AuthError {
    fn from(e: InvalidPasswordHash) -> Self {
        AuthError::InvalidInput(e.to_string())
    }
}

impl From<CodeRejection> for AuthError {
    fn from(e: CodeRejection) -> Self {
        match e {
            CodeRejection::AlreadyUsed => AuthError::CodeAlreadyUsed,
            CodeRejection::Expired => AuthError::CodeExpired,
        }
    }
}

impl From<CredentialStoreError> for AuthError {
    fn from(e: CredentialStoreError) -> Self {
        match e {
            CredentialStoreError::AccountAlreadyExists => AuthError::EmailAlreadyRegistered,
            CredentialStoreError::AccountNotFound => AuthError::AccountNotFound,
            CredentialStoreError::UnexpectedError(msg) => AuthError::Database(msg),
        }
    }
}

impl From<CodeStoreError> for AuthError {
    fn from(e: CodeStoreError) -> Self {
        match e {
            CodeStoreError::CodeNotFound => AuthError::CodeNotFound,
            CodeStoreError::CodeAlreadyUsed => AuthError::CodeAlreadyUsed,
            CodeStoreError::AccountNotFound => AuthError::AccountNotFound,
            CodeStoreError::UnexpectedError(msg) => AuthError::Database(msg),
        }
    }
}

impl From<EmailClientError> for AuthError {
    fn from(e: EmailClientError) -> Self {
        AuthError::Notification(e.0)
    }
}

impl From<PasswordHasherError> for AuthError {
    fn from(e: PasswordHasherError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid => AuthError::Unauthorized,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}
