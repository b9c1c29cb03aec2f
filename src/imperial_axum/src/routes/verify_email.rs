use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{EmailRequest, MessageResponse},
    error::ApiError,
    extract::JsonBody,
};

/// Issues a fresh verification code, replacing any earlier one.
#[tracing::instrument(name = "Send verification", skip_all)]
pub async fn verify_email(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<EmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    workflow.send_verification(&request.email).await?;

    Ok(Json(MessageResponse::new("Verification code sent")))
}
