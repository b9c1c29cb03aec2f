use axum::{Extension, Json, extract::State};
use imperial_application::AuthWorkflow;

use crate::{dto::AccountResponse, error::ApiError, middleware::AuthenticatedAccount};

/// Must sit behind [`require_auth`](crate::middleware::require_auth).
#[tracing::instrument(name = "Current account", skip_all)]
pub async fn me(
    State(workflow): State<AuthWorkflow>,
    Extension(AuthenticatedAccount(account_id)): Extension<AuthenticatedAccount>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = workflow.get_account(account_id).await?;

    Ok(Json(AccountResponse::from(&account)))
}
