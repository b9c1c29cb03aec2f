use std::sync::Arc;

use chrono::Duration;
use imperial_core::{AccountId, Clock, TokenError, TokenKind, TokenPair, TokenService, UserAccount};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::SystemClock;

pub const MIN_SECRET_BYTES: usize = 32;
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("{0} secret is not set")]
    MissingSecret(&'static str),
    #[error("{0} secret must be at least 32 bytes")]
    SecretTooShort(&'static str),
    #[error("access and refresh secrets must differ")]
    IdenticalSecrets,
    #[error("{0} token lifetime must be positive")]
    NonPositiveLifetime(&'static str),
}

/// Signing keys and lifetimes, validated once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    access_secret: Secret<String>,
    refresh_secret: Secret<String>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenConfig {
    pub fn new(
        access_secret: Secret<String>,
        refresh_secret: Secret<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenConfigError> {
        check_secret("access", &access_secret)?;
        check_secret("refresh", &refresh_secret)?;
        if access_secret.expose_secret() == refresh_secret.expose_secret() {
            return Err(TokenConfigError::IdenticalSecrets);
        }
        if access_ttl <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveLifetime("access"));
        }
        if refresh_ttl <= Duration::zero() {
            return Err(TokenConfigError::NonPositiveLifetime("refresh"));
        }

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

fn check_secret(which: &'static str, secret: &Secret<String>) -> Result<(), TokenConfigError> {
    let len = secret.expose_secret().len();
    if len == 0 {
        return Err(TokenConfigError::MissingSecret(which));
    }
    if len < MIN_SECRET_BYTES {
        return Err(TokenConfigError::SecretTooShort(which));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &Secret<String>, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }
}

/// HS256 access/refresh tokens under independent keys.
///
/// Validation pins the algorithm, requires `exp` and `sub`, allows no
/// leeway (expiry is judged by the injected clock) and checks the `typ`
/// claim, so a refresh token never passes as
/// an access token even if the keys were mixed up.
pub struct JwtTokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        // `exp` must be present, but it is checked against `clock` in
        // `decode_claims` rather than against the system time.
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access: SigningKeys::new(&config.access_secret, config.access_ttl),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_ttl),
            validation,
            clock,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn issue(&self, account: &UserAccount, kind: TokenKind) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(keys.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: account.id().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            typ: kind.as_str().to_string(),
            email: matches!(kind, TokenKind::Access).then(|| account.email().as_str().to_string()),
        };

        encode(&Header::new(ALGORITHM), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub(crate) fn decode_claims(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, typ = kind.as_str(), "token rejected");
                TokenError::Invalid
            })?;

        if claims.typ != kind.as_str() {
            tracing::debug!(typ = kind.as_str(), "token class mismatch");
            return Err(TokenError::Invalid);
        }
        if claims.exp <= self.clock.now().timestamp() {
            tracing::debug!(typ = kind.as_str(), "token expired");
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }

    fn validate(&self, token: &str, kind: TokenKind) -> Result<AccountId, TokenError> {
        let claims = self.decode_claims(token, kind)?;
        claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

impl TokenService for JwtTokenService {
    fn issue_pair(&self, account: &UserAccount) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(account, TokenKind::Access)?,
            refresh_token: self.issue(account, TokenKind::Refresh)?,
        })
    }

    fn issue_access_token(&self, account: &UserAccount) -> Result<String, TokenError> {
        self.issue(account, TokenKind::Access)
    }

    fn validate_access_token(&self, token: &str) -> Result<AccountId, TokenError> {
        self.validate(token, TokenKind::Access)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<AccountId, TokenError> {
        self.validate(token, TokenKind::Refresh)
    }
}
