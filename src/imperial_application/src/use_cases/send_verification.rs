use chrono::Duration;
use imperial_core::{
    AuthError, Clock, CodeKind, CodeStore, CredentialStore, Email, EmailClient, OneTimeCode,
};

/// Send verification use case - issues (or reissues) an email confirmation
/// code and delivers it
pub struct SendVerificationUseCase<'a, S, C, E, K>
where
    S: CredentialStore + ?Sized,
    C: CodeStore + ?Sized,
    E: EmailClient + ?Sized,
    K: Clock + ?Sized,
{
    credential_store: &'a S,
    code_store: &'a C,
    email_client: &'a E,
    clock: &'a K,
    code_ttl: Duration,
}

impl<'a, S, C, E, K> SendVerificationUseCase<'a, S, C, E, K>
where
    S: CredentialStore + ?Sized,
    C: CodeStore + ?Sized,
    E: EmailClient + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(
        credential_store: &'a S,
        code_store: &'a C,
        email_client: &'a E,
        clock: &'a K,
        code_ttl: Duration,
    ) -> Self {
        Self {
            credential_store,
            code_store,
            email_client,
            clock,
            code_ttl,
        }
    }

    /// Execute the send verification use case
    ///
    /// The stored code is not rolled back when delivery fails; asking again
    /// simply replaces it.
    #[tracing::instrument(name = "SendVerificationUseCase::execute", skip(self))]
    pub async fn execute(&self, email: Email) -> Result<(), AuthError> {
        let account = self.credential_store.get_by_email(&email).await?;
        if account.is_verified() {
            return Err(AuthError::AlreadyVerified);
        }

        let code = OneTimeCode::generate();
        let expires_at = self.clock.now() + self.code_ttl;
        self.code_store
            .issue_code(&code, account.id(), CodeKind::EmailVerification, expires_at)
            .await?;

        self.email_client
            .send_verification_code(account.email(), &code)
            .await?;

        tracing::info!(account_id = %account.id(), %expires_at, "verification code sent");
        Ok(())
    }
}
