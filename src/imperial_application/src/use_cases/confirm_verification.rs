use imperial_core::{
    AuthError, Clock, CodeKind, CodeStore, Email, OneTimeCode, Redemption, UserAccount,
};

/// Confirm verification use case - redeems an email confirmation code
pub struct ConfirmVerificationUseCase<'a, C, K>
where
    C: CodeStore + ?Sized,
    K: Clock + ?Sized,
{
    code_store: &'a C,
    clock: &'a K,
}

impl<'a, C, K> ConfirmVerificationUseCase<'a, C, K>
where
    C: CodeStore + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(code_store: &'a C, clock: &'a K) -> Self {
        Self { code_store, clock }
    }

    /// Execute the confirm verification use case
    ///
    /// # Returns
    /// The now verified account, or `CodeNotFound`, `CodeAlreadyUsed` or
    /// `CodeExpired`. A rejected code leaves the account untouched.
    #[tracing::instrument(name = "ConfirmVerificationUseCase::execute", skip(self, code))]
    pub async fn execute(
        &self,
        email: Email,
        code: OneTimeCode,
    ) -> Result<UserAccount, AuthError> {
        let stored = self
            .code_store
            .find_by_email_and_code(&email, &code, CodeKind::EmailVerification)
            .await?
            .ok_or(AuthError::CodeNotFound)?;

        let now = self.clock.now();
        stored.check_redeemable(now)?;

        let account = self
            .code_store
            .redeem(&stored, Redemption::VerifyEmail, now)
            .await?;

        tracing::info!(account_id = %account.id(), "email confirmed");
        Ok(account)
    }
}
