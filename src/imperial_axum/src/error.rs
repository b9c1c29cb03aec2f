use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use imperial_core::AuthError;
use serde::Serialize;

/// HTTP face of [`AuthError`].
#[derive(Debug)]
pub struct ApiError(pub AuthError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AuthError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();

        // Detail stays in the log; the client only gets `client_message`.
        if kind.is_server_error() {
            tracing::error!(error = %self.0, kind = kind.as_str(), "request failed");
        } else {
            tracing::debug!(error = %self.0, kind = kind.as_str(), "request rejected");
        }

        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            kind: kind.as_str(),
            message: self.0.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
