use imperial_core::{Email, EmailClient, EmailClientError, OneTimeCode};

/// Development client: writes codes to the log instead of mailing them.
#[derive(Debug, Clone, Default)]
pub struct LogEmailClient;

#[async_trait::async_trait]
impl EmailClient for LogEmailClient {
    async fn send_verification_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        tracing::info!(
            recipient = recipient.as_str(),
            code = code.as_str(),
            "verification code (not sent, log delivery)"
        );
        Ok(())
    }

    async fn send_password_reset_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        tracing::info!(
            recipient = recipient.as_str(),
            code = code.as_str(),
            "password reset code (not sent, log delivery)"
        );
        Ok(())
    }
}
