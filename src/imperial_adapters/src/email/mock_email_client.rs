use std::sync::{Arc, Mutex};

use imperial_core::{CodeKind, Email, EmailClient, EmailClientError, OneTimeCode};

#[derive(Debug, Clone)]
pub struct SentCode {
    pub kind: CodeKind,
    pub recipient: Email,
    pub code: OneTimeCode,
}

/// Records every delivery instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<Mutex<Vec<SentCode>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Most recent code of `kind` sent to `recipient`.
    pub fn last_code_for(&self, recipient: &Email, kind: CodeKind) -> Option<OneTimeCode> {
        self.sent()
            .into_iter()
            .rev()
            .find(|sent| sent.kind == kind && &sent.recipient == recipient)
            .map(|sent| sent.code)
    }

    fn record(&self, kind: CodeKind, recipient: &Email, code: &OneTimeCode) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentCode {
                kind,
                recipient: recipient.clone(),
                code: code.clone(),
            });
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_verification_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.record(CodeKind::EmailVerification, recipient, code);
        Ok(())
    }

    async fn send_password_reset_code(
        &self,
        recipient: &Email,
        code: &OneTimeCode,
    ) -> Result<(), EmailClientError> {
        self.record(CodeKind::PasswordReset, recipient, code);
        Ok(())
    }
}
