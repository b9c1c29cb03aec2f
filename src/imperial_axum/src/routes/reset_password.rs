use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{MessageResponse, ResetPasswordRequest},
    error::ApiError,
    extract::JsonBody,
};

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    workflow
        .reset_password(&request.email, &request.code, request.new_password)
        .await?;

    Ok(Json(MessageResponse::new("Password updated")))
}
