use std::sync::Arc;

use async_trait::async_trait;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use imperial_core::{AccountId, AuthValidator, TokenService};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BearerAuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
}

/// Reads `Authorization: Bearer <token>` and checks it as an access token.
#[derive(Clone)]
pub struct BearerTokenValidator {
    token_service: Arc<dyn TokenService>,
}

impl BearerTokenValidator {
    pub fn new(token_service: Arc<dyn TokenService>) -> Self {
        Self { token_service }
    }
}

#[async_trait]
impl AuthValidator for BearerTokenValidator {
    type Claims = AccountId;
    type RequestParts = http::request::Parts;
    type Error = BearerAuthError;

    async fn validate(&self, parts: &Self::RequestParts) -> Result<Self::Claims, Self::Error> {
        let Authorization(bearer) = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or(BearerAuthError::MissingToken)?;

        self.token_service
            .validate_access_token(bearer.token())
            .map_err(|_| BearerAuthError::InvalidToken)
    }
}
