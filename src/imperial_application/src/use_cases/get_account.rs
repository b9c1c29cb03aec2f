use imperial_core::{AccountId, AuthError, CredentialStore, UserAccount};

/// Get account use case - loads the account behind an authenticated request
pub struct GetAccountUseCase<'a, S>
where
    S: CredentialStore + ?Sized,
{
    credential_store: &'a S,
}

impl<'a, S> GetAccountUseCase<'a, S>
where
    S: CredentialStore + ?Sized,
{
    pub fn new(credential_store: &'a S) -> Self {
        Self { credential_store }
    }

    #[tracing::instrument(name = "GetAccountUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: AccountId) -> Result<UserAccount, AuthError> {
        Ok(self.credential_store.get_by_id(account_id).await?)
    }
}
