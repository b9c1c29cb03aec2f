use axum::{Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{
    dto::{ConfirmEmailRequest, MessageResponse},
    error::ApiError,
    extract::JsonBody,
};

#[tracing::instrument(name = "Confirm email", skip_all)]
pub async fn confirm_email(
    State(workflow): State<AuthWorkflow>,
    JsonBody(request): JsonBody<ConfirmEmailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    workflow
        .confirm_verification(&request.email, &request.code)
        .await?;

    Ok(Json(MessageResponse::new("Email confirmed")))
}
