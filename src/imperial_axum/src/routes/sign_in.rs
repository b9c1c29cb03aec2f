use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{SignInRequest, SignInResponse},
    error::ApiError,
    extract::JsonBody,
};

#[tracing::instrument(name = "Sign in", skip_all)]
pub async fn sign_in(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    let outcome = workflow.sign_in(&request.email, request.password).await?;

    Ok(Json(SignInResponse::from(outcome)))
}
