pub mod domain;
pub mod error;
pub mod ports;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    account_id::{AccountId, AccountIdError},
    email::{Email, EmailError},
    one_time_code::{CODE_LENGTH, OneTimeCode, OneTimeCodeError},
    password::{Password, PasswordError},
    password_hash::{InvalidPasswordHash, PasswordHash},
    tokens::{TokenKind, TokenPair},
    user_account::UserAccount,
    verification_code::{CodeKind, CodeRejection, DEFAULT_CODE_TTL_SECONDS, VerificationCode},
};

pub use error::{AuthError, ErrorKind};

pub use ports::{
    repositories::{
        CodeStore, CodeStoreError, CredentialStore, CredentialStoreError, Redemption,
    },
    services::{
        Clock, EmailClient, EmailClientError, PasswordHasher, PasswordHasherError, TokenError,
        TokenService,
    },
};

pub use strategies::auth_validator::AuthValidator;
