use chrono::{DateTime, Utc};
use imperial_core::{
    AccountId, CodeKind, CodeStore, CodeStoreError, Email, OneTimeCode, Redemption, UserAccount,
    VerificationCode,
};
use sqlx::{PgPool, Row, postgres::PgRow};

use super::postgres_credential_store::{ACCOUNT_COLUMNS, account_from_row};

const CODE_COLUMNS: &str =
    "vc.id, vc.user_id, vc.code, vc.type, vc.is_used, vc.expires_at, vc.created_at, vc.updated_at";

pub struct PostgresCodeStore {
    pool: PgPool,
}

impl PostgresCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn code_from_row(row: &PgRow) -> Result<VerificationCode, String> {
    let user_id = row
        .try_get::<i64, _>("user_id")
        .map_err(|e| e.to_string())?;
    let user_id = AccountId::try_from(user_id).map_err(|e| e.to_string())?;
    let code = OneTimeCode::parse(row.try_get::<&str, _>("code").map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;
    let kind: CodeKind = row.try_get::<&str, _>("type").map_err(|e| e.to_string())?.parse()?;

    Ok(VerificationCode::restore(
        row.try_get("id").map_err(|e| e.to_string())?,
        user_id,
        code,
        kind,
        row.try_get("is_used").map_err(|e| e.to_string())?,
        row.try_get("expires_at").map_err(|e| e.to_string())?,
        row.try_get("created_at").map_err(|e| e.to_string())?,
        row.try_get("updated_at").map_err(|e| e.to_string())?,
    ))
}

fn unexpected(e: impl ToString) -> CodeStoreError {
    CodeStoreError::UnexpectedError(e.to_string())
}

#[async_trait::async_trait]
impl CodeStore for PostgresCodeStore {
    #[tracing::instrument(name = "Issuing verification code in PostgreSQL", skip(self, code))]
    async fn issue_code(
        &self,
        code: &OneTimeCode,
        user_id: AccountId,
        kind: CodeKind,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationCode, CodeStoreError> {
        let sql = format!(
            r#"
                INSERT INTO verify_codes AS vc (user_id, code, type, expires_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT ON CONSTRAINT verify_codes_user_id_type_key
                DO UPDATE SET
                    code = EXCLUDED.code,
                    expires_at = EXCLUDED.expires_at,
                    is_used = FALSE,
                    updated_at = NOW()
                RETURNING {CODE_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(user_id.value())
            .bind(code.as_str())
            .bind(kind.as_str())
            .bind(expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let missing_owner = e
                    .as_database_error()
                    .is_some_and(|db_err| db_err.is_foreign_key_violation());
                if missing_owner {
                    return CodeStoreError::AccountNotFound;
                }
                unexpected(e)
            })?;

        code_from_row(&row).map_err(unexpected)
    }

    #[tracing::instrument(name = "Finding verification code by email", skip(self, code))]
    async fn find_by_email_and_code(
        &self,
        email: &Email,
        code: &OneTimeCode,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        let sql = format!(
            r#"
                SELECT {CODE_COLUMNS}
                FROM verify_codes vc
                JOIN users u ON u.id = vc.user_id
                WHERE u.email = $1 AND vc.code = $2 AND vc.type = $3
            "#
        );
        let row = sqlx::query(&sql)
            .bind(email.as_str())
            .bind(code.as_str())
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref()
            .map(code_from_row)
            .transpose()
            .map_err(unexpected)
    }

    #[tracing::instrument(name = "Finding verification code by account", skip(self))]
    async fn find_by_user_and_kind(
        &self,
        user_id: AccountId,
        kind: CodeKind,
    ) -> Result<Option<VerificationCode>, CodeStoreError> {
        let sql = format!(
            "SELECT {CODE_COLUMNS} FROM verify_codes vc WHERE vc.user_id = $1 AND vc.type = $2"
        );
        let row = sqlx::query(&sql)
            .bind(user_id.value())
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.as_ref()
            .map(code_from_row)
            .transpose()
            .map_err(unexpected)
    }

    #[tracing::instrument(name = "Updating verification code in PostgreSQL", skip_all)]
    async fn update_code(&self, code: &VerificationCode) -> Result<(), CodeStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE verify_codes
                SET code = $2, is_used = $3, expires_at = $4, updated_at = $5
                WHERE id = $1
            "#,
        )
        .bind(code.id())
        .bind(code.code().as_str())
        .bind(code.is_used())
        .bind(code.expires_at())
        .bind(code.updated_at())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CodeStoreError::CodeNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(
        name = "Redeeming verification code in PostgreSQL",
        skip(self, code, redemption)
    )]
    async fn redeem(
        &self,
        code: &VerificationCode,
        redemption: Redemption,
        now: DateTime<Utc>,
    ) -> Result<UserAccount, CodeStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // The is_used guard makes concurrent redemptions race on the row
        // lock; the loser sees zero affected rows.
        let consumed = sqlx::query(
            r#"
                UPDATE verify_codes
                SET is_used = TRUE, updated_at = $2
                WHERE id = $1 AND code = $3 AND is_used = FALSE
            "#,
        )
        .bind(code.id())
        .bind(now)
        .bind(code.code().as_str())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if consumed.rows_affected() == 0 {
            let still_exists = sqlx::query("SELECT 1 FROM verify_codes WHERE id = $1 AND code = $2")
                .bind(code.id())
                .bind(code.code().as_str())
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?
                .is_some();
            return Err(if still_exists {
                CodeStoreError::CodeAlreadyUsed
            } else {
                CodeStoreError::CodeNotFound
            });
        }

        let row = match redemption {
            Redemption::VerifyEmail => {
                let sql = format!(
                    "UPDATE users SET is_verified = TRUE, updated_at = $2 WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
                );
                sqlx::query(&sql)
                    .bind(code.user_id().value())
                    .bind(now)
                    .fetch_optional(&mut *tx)
                    .await
            }
            Redemption::ReplacePasswordHash(password_hash) => {
                let sql = format!(
                    "UPDATE users SET password_hash = $3, updated_at = $2 WHERE id = $1 RETURNING {ACCOUNT_COLUMNS}"
                );
                sqlx::query(&sql)
                    .bind(code.user_id().value())
                    .bind(now)
                    .bind(password_hash.as_str())
                    .fetch_optional(&mut *tx)
                    .await
            }
        }
        .map_err(unexpected)?
        .ok_or(CodeStoreError::AccountNotFound)?;

        let account = account_from_row(&row).map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(account)
    }
}
