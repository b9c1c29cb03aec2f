use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseSetupError {
    #[error("Failed to connect to Postgres: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] MigrateError),
}

/// Connect to Postgres and bring the schema up to date.
pub async fn configure_postgresql(
    url: &Secret<String>,
    max_connections: u32,
) -> Result<PgPool, DatabaseSetupError> {
    let pg_pool = get_postgres_pool(url, max_connections).await?;
    run_migrations(&pg_pool).await?;
    Ok(pg_pool)
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url.expose_secret())
        .await
}

pub async fn run_migrations(pg_pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pg_pool).await
}
