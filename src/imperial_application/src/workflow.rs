use std::sync::Arc;

use chrono::Duration;
use imperial_core::{
    AccountId, AuthError, Clock, CodeStore, CredentialStore, DEFAULT_CODE_TTL_SECONDS, Email,
    EmailClient, OneTimeCode, Password, PasswordHasher, TokenService, UserAccount,
};
use secrecy::Secret;

use crate::use_cases::{
    ConfirmVerificationUseCase, GetAccountUseCase, RefreshTokenUseCase,
    RequestPasswordResetUseCase, ResetPasswordUseCase, SendVerificationUseCase, SignInOutcome,
    SignInUseCase, SignUpUseCase,
};

/// Entry point for every auth operation.
///
/// Holds the ports chosen at composition time and builds a short-lived use
/// case per call. Cloning is cheap; all clones share the same ports. Inputs
/// arrive raw and are parsed here, so malformed input is always a
/// `Validation` error before any store is touched.
#[derive(Clone)]
pub struct AuthWorkflow {
    credential_store: Arc<dyn CredentialStore>,
    code_store: Arc<dyn CodeStore>,
    email_client: Arc<dyn EmailClient>,
    token_service: Arc<dyn TokenService>,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
}

impl AuthWorkflow {
    pub fn new(
        credential_store: Arc<dyn CredentialStore>,
        code_store: Arc<dyn CodeStore>,
        email_client: Arc<dyn EmailClient>,
        token_service: Arc<dyn TokenService>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credential_store,
            code_store,
            email_client,
            token_service,
            password_hasher,
            clock,
            code_ttl: Duration::seconds(DEFAULT_CODE_TTL_SECONDS),
        }
    }

    pub fn with_code_ttl(mut self, code_ttl: Duration) -> Self {
        self.code_ttl = code_ttl;
        self
    }

    pub fn token_service(&self) -> Arc<dyn TokenService> {
        Arc::clone(&self.token_service)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: Secret<String>,
    ) -> Result<UserAccount, AuthError> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;
        SignUpUseCase::new(self.credential_store.as_ref(), self.password_hasher.as_ref())
            .execute(email, password)
            .await
    }

    pub async fn send_verification(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        SendVerificationUseCase::new(
            self.credential_store.as_ref(),
            self.code_store.as_ref(),
            self.email_client.as_ref(),
            self.clock.as_ref(),
            self.code_ttl,
        )
        .execute(email)
        .await
    }

    pub async fn confirm_verification(
        &self,
        email: &str,
        code: &str,
    ) -> Result<UserAccount, AuthError> {
        let email = Email::parse(email)?;
        let code = OneTimeCode::parse(code)?;
        ConfirmVerificationUseCase::new(self.code_store.as_ref(), self.clock.as_ref())
            .execute(email, code)
            .await
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: Secret<String>,
    ) -> Result<SignInOutcome, AuthError> {
        let email = Email::parse(email)?;
        let password = Password::parse(password)?;
        SignInUseCase::new(
            self.credential_store.as_ref(),
            self.password_hasher.as_ref(),
            self.token_service.as_ref(),
        )
        .execute(email, password)
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        RefreshTokenUseCase::new(self.credential_store.as_ref(), self.token_service.as_ref())
            .execute(refresh_token)
            .await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        RequestPasswordResetUseCase::new(
            self.credential_store.as_ref(),
            self.code_store.as_ref(),
            self.email_client.as_ref(),
            self.clock.as_ref(),
            self.code_ttl,
        )
        .execute(email)
        .await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: Secret<String>,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        let code = OneTimeCode::parse(code)?;
        let new_password = Password::parse(new_password)?;
        ResetPasswordUseCase::new(
            self.code_store.as_ref(),
            self.password_hasher.as_ref(),
            self.clock.as_ref(),
        )
        .execute(email, code, new_password)
        .await
    }

    pub async fn get_account(&self, account_id: AccountId) -> Result<UserAccount, AuthError> {
        GetAccountUseCase::new(self.credential_store.as_ref())
            .execute(account_id)
            .await
    }
}
