use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{account_id::AccountId, one_time_code::OneTimeCode};

/// Lifetime of a freshly issued code unless configured otherwise.
pub const DEFAULT_CODE_TTL_SECONDS: i64 = 5 * 60;

/// Purpose a code was issued for. At most one active code exists per
/// (account, kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    EmailVerification,
    PasswordReset,
}

impl CodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::EmailVerification => "email_verification",
            CodeKind::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(CodeKind::EmailVerification),
            "password_reset" => Ok(CodeKind::PasswordReset),
            other => Err(format!("unknown verification code type: {other}")),
        }
    }
}

/// Why an otherwise matching code cannot be redeemed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeRejection {
    #[error("Verification code has already been used")]
    AlreadyUsed,
    #[error("Verification code has expired")]
    Expired,
}

/// A stored one-time code.
///
/// Lifecycle: issued, then either redeemed (`is_used`, terminal) or left to
/// expire. Expiry is evaluated lazily when the code is presented; a reissue
/// for the same account and kind overwrites the row and makes it fresh again.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    id: i64,
    user_id: AccountId,
    code: OneTimeCode,
    kind: CodeKind,
    is_used: bool,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VerificationCode {
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: i64,
        user_id: AccountId,
        code: OneTimeCode,
        kind: CodeKind,
        is_used: bool,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            code,
            kind,
            is_used,
            expires_at,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn user_id(&self) -> AccountId {
        self.user_id
    }

    pub fn code(&self) -> &OneTimeCode {
        &self.code
    }

    pub fn kind(&self) -> CodeKind {
        self.kind
    }

    pub fn is_used(&self) -> bool {
        self.is_used
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Used codes are rejected before expired ones.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), CodeRejection> {
        if self.is_used {
            return Err(CodeRejection::AlreadyUsed);
        }
        if self.is_expired(now) {
            return Err(CodeRejection::Expired);
        }
        Ok(())
    }

    pub fn mark_used(&mut self, now: DateTime<Utc>) {
        self.is_used = true;
        self.updated_at = now;
    }

    /// Overwrite with a new code and expiry, as the upsert on (user, kind) does.
    pub fn reissue(&mut self, code: OneTimeCode, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.code = code;
        self.expires_at = expires_at;
        self.is_used = false;
        self.updated_at = now;
    }
}
