use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use imperial_core::{
    AccountId, Clock, CredentialStore, CredentialStoreError, Email, PasswordHash, UserAccount,
};
use tokio::sync::RwLock;

use crate::clock::SystemClock;

#[derive(Default)]
pub(crate) struct AccountTable {
    accounts: HashMap<AccountId, UserAccount>,
    ids_by_email: HashMap<Email, AccountId>,
    last_id: i64,
}

impl AccountTable {
    pub(crate) fn by_email(&self, email: &Email) -> Option<&UserAccount> {
        self.ids_by_email
            .get(email)
            .and_then(|id| self.accounts.get(id))
    }

    pub(crate) fn by_id_mut(&mut self, id: AccountId) -> Option<&mut UserAccount> {
        self.accounts.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: AccountId) -> bool {
        self.accounts.contains_key(&id)
    }
}

/// In-memory `CredentialStore`. Clones share the same table.
#[derive(Clone)]
pub struct HashMapCredentialStore {
    pub(crate) table: Arc<RwLock<AccountTable>>,
    clock: Arc<dyn Clock>,
}

impl HashMapCredentialStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Arc::new(RwLock::new(AccountTable::default())),
            clock,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for HashMapCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CredentialStore for HashMapCredentialStore {
    #[tracing::instrument(name = "HashMapCredentialStore::create_account", skip_all)]
    async fn create_account(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserAccount, CredentialStoreError> {
        let mut table = self.table.write().await;
        if table.ids_by_email.contains_key(email) {
            return Err(CredentialStoreError::AccountAlreadyExists);
        }

        table.last_id += 1;
        let id = AccountId::try_from(table.last_id)
            .map_err(|e| CredentialStoreError::UnexpectedError(e.to_string()))?;
        let now = self.now();
        let account =
            UserAccount::restore(id, email.clone(), password_hash.clone(), false, now, now);

        table.ids_by_email.insert(email.clone(), id);
        table.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn get_by_email(&self, email: &Email) -> Result<UserAccount, CredentialStoreError> {
        self.table
            .read()
            .await
            .by_email(email)
            .cloned()
            .ok_or(CredentialStoreError::AccountNotFound)
    }

    async fn get_by_id(&self, id: AccountId) -> Result<UserAccount, CredentialStoreError> {
        self.table
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(CredentialStoreError::AccountNotFound)
    }

    async fn mark_email_confirmed(&self, email: &Email) -> Result<(), CredentialStoreError> {
        let now = self.now();
        let mut table = self.table.write().await;
        let id = *table
            .ids_by_email
            .get(email)
            .ok_or(CredentialStoreError::AccountNotFound)?;
        let account = table
            .by_id_mut(id)
            .ok_or(CredentialStoreError::AccountNotFound)?;
        account.mark_as_verified(now);
        Ok(())
    }

    async fn update_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError> {
        let mut table = self.table.write().await;
        let previous_email = table
            .accounts
            .get(&account.id())
            .map(|stored| stored.email().clone())
            .ok_or(CredentialStoreError::AccountNotFound)?;

        if &previous_email != account.email() {
            if table.ids_by_email.contains_key(account.email()) {
                return Err(CredentialStoreError::AccountAlreadyExists);
            }
            table.ids_by_email.remove(&previous_email);
            table.ids_by_email.insert(account.email().clone(), account.id());
        }

        table.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    async fn delete_account(&self, id: AccountId) -> Result<(), CredentialStoreError> {
        let mut table = self.table.write().await;
        let removed = table
            .accounts
            .remove(&id)
            .ok_or(CredentialStoreError::AccountNotFound)?;
        table.ids_by_email.remove(removed.email());
        Ok(())
    }
}
