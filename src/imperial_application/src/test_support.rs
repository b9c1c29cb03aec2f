//! In-process fakes for the ports, shared by the use case tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use imperial_core::{
    AccountId, Clock, CodeKind, CodeStore, CodeStoreError, CredentialStore, CredentialStoreError,
    Email, EmailClient, EmailClientError, OneTimeCode, Password, PasswordHash, PasswordHasher,
    PasswordHasherError, Redemption, TokenError, TokenPair, TokenService, UserAccount,
    VerificationCode,
};
use secrecy::{ExposeSecret, Secret};

pub fn email(raw: &str) -> Email {
    Email::parse(raw).unwrap()
}

pub fn password(raw: &str) -> Password {
    Password::parse(Secret::new(raw.to_string())).unwrap()
}

#[derive(Default)]
struct BackendState {
    accounts: HashMap<AccountId, UserAccount>,
    codes: Vec<VerificationCode>,
    next_account_id: i64,
    next_code_id: i64,
}

/// Accounts and codes behind one lock so `redeem` is trivially atomic.
#[derive(Default, Clone)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn account(&self, email: &Email) -> Option<UserAccount> {
        let state = self.state.lock().unwrap();
        state.accounts.values().find(|a| a.email() == email).cloned()
    }

    pub fn code_for(&self, user_id: AccountId, kind: CodeKind) -> Option<VerificationCode> {
        let state = self.state.lock().unwrap();
        state
            .codes
            .iter()
            .find(|c| c.user_id() == user_id && c.kind() == kind)
            .cloned()
    }
}

#[async_trait]
impl CredentialStore for FakeBackend {
    async fn create_account(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserAccount, CredentialStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.accounts.values().any(|a| a.email() == email) {
            return Err(CredentialStoreError::AccountAlreadyExists);
        }
        state.next_account_id += 1;
        let id = AccountId::try_from(state.next_account_id).unwrap();
        let now = Utc::now();
        let account =
            UserAccount::restore(id, email.clone(), password_hash.clone(), false, now, now);
        state.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_by_email(&self, email: &Email) -> Result<UserAccount, CredentialStoreError> {
        self.account(email)
            .ok_or(CredentialStoreError::AccountNotFound)
    }

    async fn get_by_id(&self, id: AccountId) -> Result<UserAccount, CredentialStoreError> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .get(&id)
            .cloned()
            .ok_or(CredentialStoreError::AccountNotFound)
    }

    async fn mark_email_confirmed(&self, email: &Email) -> Result<(), CredentialStoreError> {
        let mut state = self.state.lock().unwrap();
        let account = state
            .accounts
            .values_mut()
            .find(|a| a.email() == email)
            .ok_or(CredentialStoreError::AccountNotFound)?;
        account.mark_as_verified(Utc::now());
        Ok(())
    }

    async fn update_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError> {
        let mut state = self.state.lock().unwrap();
        match state.accounts.get_mut(&account.id()) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(CredentialStoreError::AccountNotFound),
        }
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), CredentialStoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .accounts
            .remove(&id)
            .ok_or(CredentialStoreError::AccountNotFound)?;
        state.codes.retain(|c| c.user_id() != id);
        Ok(())
    }
}

#[async_trait]
impl CodeStore for FakeBackend {
    async fn issue_code(
        &self,
        code: &OneTimeCode,
        user_id: AccountId,
        kind: CodeKind,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationCode, CodeStoreError> {
        let mut state = self.state.lock().unwrap();
        if !state.accounts.contains_key(&user_id) {
            return Err(CodeStoreError::AccountNotFound);
        }
        let now = Utc::now();
        if let Some(existing) = state
            .codes
            .iter_mut()
            .find(|c| c.user_id() == user_id && c.kind() == kind)
        {
            existing.reissue(code.clone(), expires_at, now);
            return Ok(existing.clone());
        }
        state.next_code_id += 1;
        let issued = VerificationCode::restore(
            state.next_code_id,
            user_id,
            code.clone(),
            kind,
            false,
            expires_at,
            now,
            now,
        );
        state.codes.push(issued.clone());
        Ok(issued)
    }

    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &OneTimeCode,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        let state = self.state.lock().unwrap();
        let Some(owner) = state.accounts.values().find(|a| a.email() == email) else {
            return Ok(None);
        };
        Ok(state
            .codes
            .iter()
            .find(|c| c.user_id() == owner.id() && c.kind() == kind && c.code() == code)
            .cloned())
    }

    async fn find_by_user_and_kind(
        &self,
        user_id: AccountId,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        Ok(self.code_for(user_id, kind))
    }

    async fn update_code(&self, code: &VerificationCode) -> Result<(), CodeStoreError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .codes
            .iter_mut()
            .find(|c| c.id() == code.id())
            .ok_or(CodeStoreError::CodeNotFound)?;
        *stored = code.clone();
        Ok(())
    }

    async fn redeem(
        &self,
        code: &VerificationCode,
        redemption: Redemption,
        now: DateTime<Utc>,
    ) -> Result<UserAccount, CodeStoreError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .codes
            .iter_mut()
            .find(|c| c.id() == code.id())
            .ok_or(CodeStoreError::CodeNotFound)?;
        if stored.is_used() {
            return Err(CodeStoreError::CodeAlreadyUsed);
        }
        stored.mark_used(now);
        let account = state
            .accounts
            .get_mut(&code.user_id())
            .ok_or(CodeStoreError::AccountNotFound)?;
        match redemption {
            Redemption::VerifyEmail => account.mark_as_verified(now),
            Redemption::ReplacePasswordHash(hash) => account.set_password_hash(hash, now),
        }
        Ok(account.clone())
    }
}

const FAKE_HASH_PREFIX: &str = "$fake$v=1$not-a-real-salt$";

/// Reversible "hash" so tests can assert on what was stored.
pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &Password) -> Result<Secret<String>, PasswordHasherError> {
        let plaintext = password.as_ref().expose_secret();
        Ok(Secret::new(format!("{FAKE_HASH_PREFIX}{plaintext}")))
    }

    async fn verify(
        &self,
        hash: &PasswordHash,
        candidate: &Password,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = candidate.as_ref().expose_secret();
        Ok(hash.as_str() == format!("{FAKE_HASH_PREFIX}{plaintext}"))
    }
}

/// Produces output too short to be a real hash.
pub struct TruncatingHasher;

#[async_trait]
impl PasswordHasher for TruncatingHasher {
    async fn hash(&self, _password: &Password) -> Result<Secret<String>, PasswordHasherError> {
        Ok(Secret::new("abc".to_string()))
    }

    async fn verify(
        &self,
        _hash: &PasswordHash,
        _candidate: &Password,
    ) -> Result<bool, PasswordHasherError> {
        Ok(false)
    }
}

#[derive(Debug, Clone)]
pub struct Delivery {
    pub kind: CodeKind,
    pub recipient: String,
    pub code: OneTimeCode,
}

#[derive(Default, Clone)]
pub struct RecordingEmailClient {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
    fail: bool,
}

impl RecordingEmailClient {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    pub fn last_code(&self, kind: CodeKind) -> Option<OneTimeCode> {
        self.deliveries()
            .into_iter()
            .rev()
            .find(|d| d.kind == kind)
            .map(|d| d.code)
    }

    fn record(
        &self,
        kind: CodeKind,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        if self.fail {
            return Err(EmailClientError("mail relay unavailable".to_string()));
        }
        self.deliveries.lock().unwrap().push(Delivery {
            kind,
            recipient: recipient.as_str().to_string(),
            code: code.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl EmailClient for RecordingEmailClient {
    async fn send_verification_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.record(CodeKind::EmailVerification, recipient, code)
    }

    async fn send_password_reset_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.record(CodeKind::PasswordReset, recipient, code)
    }
}

/// Unsigned, human-readable tokens: `access:<id>:<email>` and `refresh:<id>`.
pub struct StubTokenService;

impl TokenService for StubTokenService {
    fn issue_pair(&self, account: &UserAccount) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(account)?,
            refresh_token: format!("refresh:{}", account.id()),
        })
    }

    fn issue_access_token(&self, account: &UserAccount) -> Result<String, TokenError> {
        Ok(format!("access:{}:{}", account.id(), account.email().as_str()))
    }

    fn validate_access_token(&self, token: &str) -> Result<AccountId, TokenError> {
        let rest = token.strip_prefix("access:").ok_or(TokenError::Invalid)?;
        let (id, _) = rest.split_once(':').ok_or(TokenError::Invalid)?;
        id.parse().map_err(|_| TokenError::Invalid)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<AccountId, TokenError> {
        token
            .strip_prefix("refresh:")
            .ok_or(TokenError::Invalid)?
            .parse()
            .map_err(|_| TokenError::Invalid)
    }
}

pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn new() -> Self {
        Self(Mutex::new(Utc::now()))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
