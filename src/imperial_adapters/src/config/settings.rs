use std::{path::Path, time::Duration as StdDuration};

use chrono::Duration;
use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState,
};
use http::HeaderValue;
use imperial_core::{DEFAULT_CODE_TTL_SECONDS, Email, EmailError};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

use super::constants::{
    CONFIG_DIR, DEFAULT_ENVIRONMENT,
    env::{
        APP_ENVIRONMENT_ENV_VAR, DATABASE_URL_ENV_VAR, JWT_ACCESS_SECRET_ENV_VAR,
        JWT_REFRESH_SECRET_ENV_VAR, POSTMARK_AUTH_TOKEN_ENV_VAR, SETTINGS_ENV_PREFIX,
        SETTINGS_ENV_SEPARATOR,
    },
    prod,
};
use crate::{
    authentication::jwt_token_service::{
        DEFAULT_ACCESS_TOKEN_TTL_SECONDS, DEFAULT_REFRESH_TOKEN_TTL_SECONDS, TokenConfig,
        TokenConfigError,
    },
    hashing::HashingParams,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub hashing: HashingParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub access_token_secret: Secret<String>,
    pub refresh_token_secret: Secret<String>,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub code_ttl_seconds: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("verification code lifetime must be positive")]
pub struct InvalidCodeTtl;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// No URL means the in-memory stores are used.
    pub url: Option<Secret<String>>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Log,
    Postmark,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub provider: EmailProvider,
    pub base_url: String,
    pub sender: String,
    pub auth_token: Option<Secret<String>>,
    pub timeout_millis: u64,
}

impl Settings {
    /// Load `.env`, then defaults, `config/base.json`,
    /// `config/{APP_ENVIRONMENT}.json` and `IMPERIAL__*` variables, in
    /// increasing precedence. The conventional `JWT_*_SECRET`,
    /// `DATABASE_URL` and `POSTMARK_AUTH_TOKEN` variables win over all of
    /// them.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = std::env::var(APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
        Self::load_from(Path::new(CONFIG_DIR), &environment)
    }

    pub fn load_from(config_dir: &Path, environment: &str) -> Result<Self, ConfigError> {
        let env_var = |name: &str| std::env::var(name).ok();

        Self::with_defaults()?
            .add_source(File::from(config_dir.join("base")).required(false))
            .add_source(File::from(config_dir.join(environment)).required(false))
            .add_source(
                Environment::with_prefix(SETTINGS_ENV_PREFIX)
                    .prefix_separator(SETTINGS_ENV_SEPARATOR)
                    .separator(SETTINGS_ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("auth.access_token_secret", env_var(JWT_ACCESS_SECRET_ENV_VAR))?
            .set_override_option(
                "auth.refresh_token_secret",
                env_var(JWT_REFRESH_SECRET_ENV_VAR),
            )?
            .set_override_option("database.url", env_var(DATABASE_URL_ENV_VAR))?
            .set_override_option("email_client.auth_token", env_var(POSTMARK_AUTH_TOKEN_ENV_VAR))?
            .build()?
            .try_deserialize()
    }

    // Secrets default to empty so a missing secret is reported by
    // `token_config` rather than as a deserialization error.
    pub(crate) fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("application.host", prod::APP_HOST)?
            .set_default("application.port", i64::from(prod::APP_PORT))?
            .set_default("auth.access_token_secret", "")?
            .set_default("auth.refresh_token_secret", "")?
            .set_default("auth.access_token_ttl_seconds", DEFAULT_ACCESS_TOKEN_TTL_SECONDS)?
            .set_default("auth.refresh_token_ttl_seconds", DEFAULT_REFRESH_TOKEN_TTL_SECONDS)?
            .set_default("auth.code_ttl_seconds", DEFAULT_CODE_TTL_SECONDS)?
            .set_default("database.max_connections", 10_i64)?
            .set_default("email_client.provider", "log")?
            .set_default("email_client.base_url", prod::email_client::BASE_URL)?
            .set_default("email_client.sender", prod::email_client::SENDER)?
            .set_default(
                "email_client.timeout_millis",
                prod::email_client::TIMEOUT_MILLIS as i64,
            )?
            .set_default("hashing.memory_kib", 15000_i64)?
            .set_default("hashing.iterations", 2_i64)?
            .set_default("hashing.parallelism", 1_i64)
    }
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `None` when no origins are configured, which disables CORS.
    pub fn allowed_origins(&self) -> Option<AllowedOrigins> {
        if self.allowed_origins.is_empty() {
            return None;
        }
        let origins = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid allowed origin");
                    None
                }
            })
            .collect();
        Some(AllowedOrigins(origins))
    }
}

impl AuthSettings {
    pub fn token_config(&self) -> Result<TokenConfig, TokenConfigError> {
        TokenConfig::new(
            self.access_token_secret.clone(),
            self.refresh_token_secret.clone(),
            Duration::seconds(self.access_token_ttl_seconds),
            Duration::seconds(self.refresh_token_ttl_seconds),
        )
    }

    pub fn code_ttl(&self) -> Result<Duration, InvalidCodeTtl> {
        if self.code_ttl_seconds <= 0 {
            return Err(InvalidCodeTtl);
        }
        Ok(Duration::seconds(self.code_ttl_seconds))
    }
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<Email, EmailError> {
        Email::parse(&self.sender)
    }

    pub fn timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.timeout_millis)
    }
}

#[derive(Debug, Clone)]
pub struct AllowedOrigins(Vec<HeaderValue>);

impl AllowedOrigins {
    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }
}
