use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, eyre};
use imperial::{
    Argon2PasswordHasher, AuthService, AuthWorkflow, Clock, CodeStore, CredentialStore,
    EmailClient, HashMapCodeStore, HashMapCredentialStore, JwtTokenService, LogEmailClient,
    PostgresCodeStore, PostgresCredentialStore, PostmarkEmailClient, SystemClock,
    adapters::config::{EmailClientSettings, EmailProvider, Settings},
    configure_postgresql,
};
use reqwest::Client as HttpClient;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load().wrap_err("Failed to load settings")?;

    // Bad secrets abort here, before anything is served.
    let token_config = settings
        .auth
        .token_config()
        .wrap_err("Invalid token configuration")?;
    let code_ttl = settings
        .auth
        .code_ttl()
        .wrap_err("Invalid verification code lifetime")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (credential_store, code_store): (Arc<dyn CredentialStore>, Arc<dyn CodeStore>) =
        match &settings.database.url {
            Some(url) => {
                let pg_pool = configure_postgresql(url, settings.database.max_connections).await?;
                tracing::info!("Using Postgres stores");
                (
                    Arc::new(PostgresCredentialStore::new(pg_pool.clone())),
                    Arc::new(PostgresCodeStore::new(pg_pool)),
                )
            }
            None => {
                tracing::warn!("No database configured, using in-memory stores");
                let accounts = HashMapCredentialStore::with_clock(clock.clone());
                let codes = HashMapCodeStore::with_clock(accounts.clone(), clock.clone());
                (Arc::new(accounts), Arc::new(codes))
            }
        };

    let email_client = build_email_client(&settings.email_client)?;
    let password_hasher = Argon2PasswordHasher::new(settings.hashing)?;
    let token_service = JwtTokenService::with_clock(token_config, clock.clone());

    let workflow = AuthWorkflow::new(
        credential_store,
        code_store,
        email_client,
        Arc::new(token_service),
        Arc::new(password_hasher),
        clock,
    )
    .with_code_ttl(code_ttl);

    let listener = tokio::net::TcpListener::bind(settings.application.address()).await?;

    AuthService::new(workflow)
        .run_standalone(listener, settings.application.allowed_origins())
        .await?;

    Ok(())
}

fn build_email_client(settings: &EmailClientSettings) -> Result<Arc<dyn EmailClient>> {
    match settings.provider {
        EmailProvider::Log => Ok(Arc::new(LogEmailClient)),
        EmailProvider::Postmark => {
            let auth_token = settings
                .auth_token
                .clone()
                .ok_or_else(|| eyre!("Postmark provider requires an auth token"))?;
            let http_client = HttpClient::builder().timeout(settings.timeout()).build()?;

            Ok(Arc::new(PostmarkEmailClient::new(
                settings.base_url.clone(),
                settings.sender()?,
                auth_token,
                http_client,
            )))
        }
    }
}

fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
