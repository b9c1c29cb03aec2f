use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;
use secrecy::ExposeSecret;

use crate::{
    dto::{RefreshTokenRequest, RefreshTokenResponse},
    error::ApiError,
    extract::JsonBody,
};

/// Mints a new access token. The refresh token itself stays valid until it
/// expires.
#[tracing::instrument(name = "Refresh token", skip_all)]
pub async fn refresh_token(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    let access_token = workflow
        .refresh_token(request.refresh_token.expose_secret())
        .await?;

    Ok(Json(RefreshTokenResponse { access_token }))
}
