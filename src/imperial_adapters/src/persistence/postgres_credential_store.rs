use imperial_core::{
    AccountId, CredentialStore, CredentialStoreError, Email, PasswordHash, UserAccount,
};
use secrecy::Secret;
use sqlx::{PgPool, Row, postgres::PgRow};

pub(crate) const ACCOUNT_COLUMNS: &str =
    "id, email, password_hash, is_verified, created_at, updated_at";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn account_from_row(row: &PgRow) -> Result<UserAccount, String> {
    let id = AccountId::try_from(row.try_get::<i64, _>("id").map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;
    let email = Email::parse(row.try_get::<&str, _>("email").map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;
    let password_hash = PasswordHash::parse(Secret::new(
        row.try_get::<String, _>("password_hash")
            .map_err(|e| e.to_string())?,
    ))
    .map_err(|e| e.to_string())?;

    Ok(UserAccount::restore(
        id,
        email,
        password_hash,
        row.try_get("is_verified").map_err(|e| e.to_string())?,
        row.try_get("created_at").map_err(|e| e.to_string())?,
        row.try_get("updated_at").map_err(|e| e.to_string())?,
    ))
}

fn unexpected(e: impl ToString) -> CredentialStoreError {
    CredentialStoreError::UnexpectedError(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[async_trait::async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[tracing::instrument(name = "Adding account to PostgreSQL", skip_all)]
    async fn create_account(
        &self,
        email: &Email,
        password_hash: &PasswordHash,
    ) -> Result<UserAccount, CredentialStoreError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(email.as_str())
            .bind(password_hash.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    return CredentialStoreError::AccountAlreadyExists;
                }
                unexpected(e)
            })?;

        account_from_row(&row).map_err(unexpected)
    }

    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn get_by_email(&self, email: &Email) -> Result<UserAccount, CredentialStoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or(CredentialStoreError::AccountNotFound)?;

        account_from_row(&row).map_err(unexpected)
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip(self))]
    async fn get_by_id(&self, id: AccountId) -> Result<UserAccount, CredentialStoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .ok_or(CredentialStoreError::AccountNotFound)?;

        account_from_row(&row).map_err(unexpected)
    }

    #[tracing::instrument(name = "Marking email confirmed in PostgreSQL", skip_all)]
    async fn mark_email_confirmed(&self, email: &Email) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE email = $1",
        )
        .bind(email.as_str())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::AccountNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Updating account in PostgreSQL", skip_all)]
    async fn update_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE users
                SET email = $2, password_hash = $3, is_verified = $4, updated_at = $5
                WHERE id = $1
            "#,
        )
        .bind(account.id().value())
        .bind(account.email().as_str())
        .bind(account.password_hash().as_str())
        .bind(account.is_verified())
        .bind(account.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return CredentialStoreError::AccountAlreadyExists;
            }
            unexpected(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::AccountNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Deleting account from PostgreSQL", skip(self))]
    async fn delete_account(&self, id: AccountId) -> Result<(), CredentialStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(CredentialStoreError::AccountNotFound);
        }
        Ok(())
    }
}
