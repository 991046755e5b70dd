//! Error responses.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use tripcover_shared::AppError;

/// Response wrapper for [`AppError`].
///
/// The body is `{"error": "<message>"}`. Server-side errors are logged with
/// their detail and answered with a generic message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !self.0.is_client_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}

/// Turns a handler panic into a generic 500 response.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    ApiError(AppError::Internal(format!("handler panicked: {detail}"))).into_response()
}
