use imperial_core::{
    AuthError, CredentialStore, CredentialStoreError, Email, Password, PasswordHash,
    PasswordHasher, UserAccount,
};

/// Sign-up use case - registers a new, unverified account
pub struct SignUpUseCase<'a, S, H>
where
    S: CredentialStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    credential_store: &'a S,
    password_hasher: &'a H,
}

impl<'a, S, H> SignUpUseCase<'a, S, H>
where
    S: CredentialStore + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub fn new(credential_store: &'a S, password_hasher: &'a H) -> Self {
        Self {
            credential_store,
            password_hasher,
        }
    }

    /// Execute the sign-up use case
    ///
    /// The existence check is only a fast path. Two concurrent sign-ups for
    /// the same address can both pass it; the store's unique constraint then
    /// rejects the second insert with the same conflict.
    #[tracing::instrument(name = "SignUpUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<UserAccount, AuthError> {
        match self.credential_store.get_by_email(&email).await {
            Ok(_) => return Err(AuthError::EmailAlreadyRegistered),
            Err(CredentialStoreError::AccountNotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let hashed = self.password_hasher.hash(&password).await?;
        let password_hash = PasswordHash::parse(hashed)?;

        let account = self
            .credential_store
            .create_account(&email, &password_hash)
            .await?;

        tracing::info!(account_id = %account.id(), "account created");
        Ok(account)
    }
}
