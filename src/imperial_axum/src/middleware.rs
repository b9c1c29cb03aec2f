//! Request gate for protected routes.

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use imperial_core::{AccountId, AuthError, AuthValidator};

use crate::error::ApiError;

/// Subject of a validated access token, placed in the request extensions by
/// [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub AccountId);

/// Rejects the request with `401` unless `validator` accepts it.
///
/// Install with `axum::middleware::from_fn_with_state(validator, require_auth::<V>)`.
/// Handlers behind it read `Extension<AuthenticatedAccount>`.
pub async fn require_auth<V>(
    State(validator): State<V>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    V: AuthValidator<Claims = AccountId, RequestParts = Parts>,
{
    let (parts, body) = request.into_parts();

    let account_id = validator.validate(&parts).await.map_err(|e| {
        tracing::debug!(error = %e, "request gate rejected credentials");
        ApiError(AuthError::Unauthorized)
    })?;

    let mut request = Request::from_parts(parts, body);
    request
        .extensions_mut()
        .insert(AuthenticatedAccount(account_id));

    Ok(next.run(request).await)
}
