use chrono::Duration;
use imperial_core::{
    AuthError, Clock, CodeKind, CodeStore, CredentialStore, Email, EmailClient, OneTimeCode,
};

/// Request password reset use case - issues a reset code and mails it
pub struct RequestPasswordResetUseCase<'a, S, C, E, K>
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

impl<'a, S, C, E, K> RequestPasswordResetUseCase<'a, S, C, E, K>
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

    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip(self))]
    pub async fn execute(&self, email: Email) -> Result<(), AuthError> {
        let account = self.credential_store.get_by_email(&email).await?;

        let code = OneTimeCode::generate();
        let expires_at = self.clock.now() + self.code_ttl;
        self.code_store
            .issue_code(&code, account.id(), CodeKind::PasswordReset, expires_at)
            .await?;

        self.email_client
            .send_password_reset_code(account.email(), &code)
            .await?;

        tracing::info!(account_id = %account.id(), %expires_at, "password reset code sent");
        Ok(())
    }
}
