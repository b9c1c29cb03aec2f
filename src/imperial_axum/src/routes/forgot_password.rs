use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{EmailRequest, MessageResponse},
    error::ApiError,
    extract::JsonBody,
};

#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    workflow.request_password_reset(&request.email).await?;

    Ok(Json(MessageResponse::new("Password reset code sent")))
}
