use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{AccountResponse, SignUpRequest},
    error::ApiError,
    extract::JsonBody,
};

#[tracing::instrument(name = "Sign up", skip_all)]
pub async fn sign_up(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = workflow.sign_up(&request.email, request.password).await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}
