use imperial_core::{
    AuthError, Clock, CodeKind, CodeStore, Email, OneTimeCode, Password, PasswordHash,
    PasswordHasher, Redemption,
};

/// Reset password use case - redeems a reset code and replaces the stored
/// password hash in the same step
pub struct ResetPasswordUseCase<'a, C, H, K>
where
    C: CodeStore + ?Sized,
    H: PasswordHasher + ?Sized,
    K: Clock + ?Sized,
{
    code_store: &'a C,
    password_hasher: &'a H,
    clock: &'a K,
}

impl<'a, C, H, K> ResetPasswordUseCase<'a, C, H, K>
where
    C: CodeStore + ?Sized,
    H: PasswordHasher + ?Sized,
    K: Clock + ?Sized,
{
    pub fn new(code_store: &'a C, password_hasher: &'a H, clock: &'a K) -> Self {
        Self {
            code_store,
            password_hasher,
            clock,
        }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self, code, new_password))]
    pub async fn execute(
        &self,
        email: Email,
        code: OneTimeCode,
        new_password: Password,
    ) -> Result<(), AuthError> {
        let stored = self
            .code_store
            .find_by_email_and_code(&email, &code, CodeKind::PasswordReset)
            .await?
            .ok_or(AuthError::CodeNotFound)?;
        stored.check_redeemable(self.clock.now())?;

        let hashed = self.password_hasher.hash(&new_password).await?;
        let password_hash = PasswordHash::parse(hashed)?;

        // hashing is slow, so take a fresh timestamp for the write
        let account = self
            .code_store
            .redeem(
                &stored,
                Redemption::ReplacePasswordHash(password_hash),
                self.clock.now(),
            )
            .await?;

        tracing::info!(account_id = %account.id(), "password reset");
        Ok(())
    }
}
