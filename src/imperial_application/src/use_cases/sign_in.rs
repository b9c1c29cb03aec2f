use imperial_core::{
    AuthError, CredentialStore, Email, Password, PasswordHasher, TokenPair, TokenService,
    UserAccount,
};

/// Result of a successful sign-in
#[derive(Debug)]
pub struct SignInOutcome {
    pub account: UserAccount,
    pub tokens: TokenPair,
}

/// Sign-in use case - checks credentials and mints a token pair
pub struct SignInUseCase<'a, S, H, T>
where
    S: CredentialStore + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    credential_store: &'a S,
    password_hasher: &'a H,
    token_service: &'a T,
}

impl<'a, S, H, T> SignInUseCase<'a, S, H, T>
where
    S: CredentialStore + ?Sized,
    H: PasswordHasher + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(credential_store: &'a S, password_hasher: &'a H, token_service: &'a T) -> Self {
        Self {
            credential_store,
            password_hasher,
            token_service,
        }
    }

    /// Execute the sign-in use case
    ///
    /// An unknown email is `AccountNotFound`; a known email with the wrong
    /// password is `InvalidCredentials`.
    #[tracing::instrument(name = "SignInUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
    ) -> Result<SignInOutcome, AuthError> {
        let account = self.credential_store.get_by_email(&email).await?;

        let matches = self
            .password_hasher
            .verify(account.password_hash(), &password)
            .await?;
        if !matches {
            tracing::debug!(account_id = %account.id(), "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.token_service.issue_pair(&account)?;
        Ok(SignInOutcome { account, tokens })
    }
}
