use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    account_id::AccountId,
    email::Email,
    one_time_code::OneTimeCode,
    password_hash::PasswordHash,
    user_account::UserAccount,
    verification_code::{CodeKind, VerificationCode},
};

// CredentialStore port trait and errors
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("Account already exists")]
    AccountAlreadyExists,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for CredentialStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::AccountAlreadyExists, Self::AccountAlreadyExists)
                | (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new, unverified account. A duplicate email is
    /// `AccountAlreadyExists` regardless of any earlier lookup.
    async fn create_account(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserAccount, CredentialStoreError>;
    async fn get_by_email(&self, email: &Email) -> Result<UserAccount, CredentialStoreError>;
    async fn get_by_id(&self, id: AccountId) -> Result<UserAccount, CredentialStoreError>;
    async fn mark_email_confirmed(&self, email: &Email) -> Result<(), CredentialStoreError>;
    async fn update_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError>;
    async fn delete_account(&self, id: AccountId) -> Result<(), CredentialStoreError>;
}

// CodeStore port trait and errors
#[derive(Debug, Error)]
pub enum CodeStoreError {
    #[error("Verification code not found")]
    CodeNotFound,
    #[error("Verification code has already been used")]
    CodeAlreadyUsed,
    #[error("Account not found")]
    AccountNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for CodeStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::CodeNotFound, Self::CodeNotFound)
                | (Self::CodeAlreadyUsed, Self::CodeAlreadyUsed)
                | (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Account mutation applied together with consuming a code.
#[derive(Debug, Clone)]
pub enum Redemption {
    VerifyEmail,
    ReplacePasswordHash(PasswordHash),
}

#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Issue or replace the code for `(user_id, kind)`. Replacing resets
    /// `is_used` so the new code is the only one that can be redeemed.
    async fn issue_code(
        &self,
        code: &OneTimeCode,
        user_id: AccountId,
        kind: CodeKind,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationCode, CodeStoreError>;
    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &OneTimeCode,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError>;
    async fn find_by_user_and_kind(
        &self,
        user_id: AccountId,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError>;
    async fn update_code(&self, code: &VerificationCode) -> Result<(), CodeStoreError>;

    /// Mark `code` used and apply `redemption` to its owner as one atomic
    /// step. Fails with `CodeAlreadyUsed` if another caller got there first.
    async fn redeem(
        &self,
        code: &VerificationCode,
        redemption: Redemption,
        now: DateTime<Utc>,
    ) -> Result<UserAccount, CodeStoreError>;
}
