use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use imperial_core::{
    AccountId, Clock, CodeKind, CodeStore, CodeStoreError, Email, OneTimeCode, Redemption,
    UserAccount, VerificationCode,
};
use tokio::sync::RwLock;

use super::hashmap_credential_store::HashMapCredentialStore;
use crate::clock::SystemClock;

#[derive(Default)]
struct CodeTable {
    codes: HashMap<(AccountId, CodeKind), VerificationCode>,
    last_id: i64,
}

/// In-memory `CodeStore` layered over a [`HashMapCredentialStore`].
///
/// Codes are keyed by `(account, kind)`, so reissuing overwrites in place.
/// `redeem` holds the code table lock and then the account table lock,
/// making consume-and-apply atomic with respect to every other caller.
#[derive(Clone)]
pub struct HashMapCodeStore {
    codes: Arc<RwLock<CodeTable>>,
    accounts: HashMapCredentialStore,
    clock: Arc<dyn Clock>,
}

impl HashMapCodeStore {
    pub fn new(accounts: HashMapCredentialStore) -> Self {
        Self::with_clock(accounts, Arc::new(SystemClock))
    }

    pub fn with_clock(accounts: HashMapCredentialStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            codes: Arc::new(RwLock::new(CodeTable::default())),
            accounts,
            clock,
        }
    }
}

#[async_trait::async_trait]
impl CodeStore for HashMapCodeStore {
    #[tracing::instrument(name = "HashMapCodeStore::issue_code", skip(self, code))]
    async fn issue_code(
        &self,
        code: &OneTimeCode,
        user_id: AccountId,
        kind: CodeKind,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationCode, CodeStoreError> {
        if !self.accounts.table.read().await.contains(user_id) {
            return Err(CodeStoreError::AccountNotFound);
        }

        let now = self.clock.now();
        let mut table = self.codes.write().await;
        if let Some(existing) = table.codes.get_mut(&(user_id, kind)) {
            existing.reissue(code.clone(), expires_at, now);
            return Ok(existing.clone());
        }

        table.last_id += 1;
        let issued = VerificationCode::restore(
            table.last_id,
            user_id,
            code.clone(),
            kind,
            false,
            expires_at,
            now,
            now,
        );
        table.codes.insert((user_id, kind), issued.clone());
        Ok(issued)
    }

    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &OneTimeCode,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        let owner = match self.accounts.table.read().await.by_email(email) {
            Some(account) => account.id(),
            None => return Ok(None),
        };

        Ok(self
            .codes
            .read()
            .await
            .codes
            .get(&(owner, kind))
            .filter(|stored| stored.code() == code)
            .cloned())
    }

    async fn find_by_user_and_kind(
        &self,
        user_id: AccountId,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        Ok(self.codes.read().await.codes.get(&(user_id, kind)).cloned())
    }

    async fn update_code(&self, code: &VerificationCode) -> Result<(), CodeStoreError> {
        let mut table = self.codes.write().await;
        let stored = table
            .codes
            .get_mut(&(code.user_id(), code.kind()))
            .filter(|stored| stored.id() == code.id())
            .ok_or(CodeStoreError::CodeNotFound)?;
        *stored = code.clone();
        Ok(())
    }

    #[tracing::instrument(name = "HashMapCodeStore::redeem", skip(self, code, redemption))]
    async fn redeem(
        &self,
        code: &VerificationCode,
        redemption: Redemption,
        now: DateTime<Utc>,
    ) -> Result<UserAccount, CodeStoreError> {
        let mut codes = self.codes.write().await;
        let mut accounts = self.accounts.table.write().await;

        let stored = codes
            .codes
            .get_mut(&(code.user_id(), code.kind()))
            .filter(|stored| stored.id() == code.id() && stored.code() == code.code())
            .ok_or(CodeStoreError::CodeNotFound)?;
        if stored.is_used() {
            return Err(CodeStoreError::CodeAlreadyUsed);
        }

        let account = accounts
            .by_id_mut(code.user_id())
            .ok_or(CodeStoreError::AccountNotFound)?;

        stored.mark_used(now);
        match redemption {
            Redemption::VerifyEmail => account.mark_as_verified(now),
            Redemption::ReplacePasswordHash(hash) => account.set_password_hash(hash, now),
        }
        Ok(account.clone())
    }
}
