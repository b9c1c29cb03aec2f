use chrono::{DateTime, Utc};

use super::{account_id::AccountId, email::Email, password_hash::PasswordHash};

/// A registered account.
///
/// Accounts are created by the credential store (which assigns the id) and
/// only change through the mutators below, each of which bumps `updated_at`.
#[derive(Debug, Clone)]
pub struct UserAccount {
    id: AccountId,
    email: Email,
    password_hash: PasswordHash,
    is_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Rebuild an account from persisted state.
    pub fn restore(
        id: AccountId,
        email: Email,
        password_hash: PasswordHash,
        is_verified: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            is_verified,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn set_email(&mut self, email: Email, now: DateTime<Utc>) {
        self.email = email;
        self.touch(now);
    }

    pub fn set_password_hash(&mut self, password_hash: PasswordHash, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.touch(now);
    }

    pub fn mark_as_verified(&mut self, now: DateTime<Utc>) {
        self.is_verified = true;
        self.touch(now);
    }

    // updated_at never moves backwards, even if the clock does
    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}
