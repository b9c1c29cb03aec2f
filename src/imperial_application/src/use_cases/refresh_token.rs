use imperial_core::{AuthError, CredentialStore, CredentialStoreError, TokenService};

/// Refresh token use case - trades a refresh token for a new access token
pub struct RefreshTokenUseCase<'a, S, T>
where
    S: CredentialStore + ?Sized,
    T: TokenService + ?Sized,
{
    credential_store: &'a S,
    token_service: &'a T,
}

impl<'a, S, T> RefreshTokenUseCase<'a, S, T>
where
    S: CredentialStore + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(credential_store: &'a S, token_service: &'a T) -> Self {
        Self {
            credential_store,
            token_service,
        }
    }

    /// Execute the refresh token use case
    ///
    /// The refresh token itself is neither rotated nor revoked. The new
    /// access token carries the account's current email.
    #[tracing::instrument(name = "RefreshTokenUseCase::execute", skip_all)]
    pub async fn execute(&self, refresh_token: &str) -> Result<String, AuthError> {
        let account_id = self.token_service.validate_refresh_token(refresh_token)?;

        let account = match self.credential_store.get_by_id(account_id).await {
            Ok(account) => account,
            Err(CredentialStoreError::AccountNotFound) => {
                tracing::debug!(%account_id, "refresh token subject no longer exists");
                return Err(AuthError::Unauthorized);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(self.token_service.issue_access_token(&account)?)
    }
}
