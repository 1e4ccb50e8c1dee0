//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`playgate_core::Error`] so that route
//! handlers can return `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: playgate_core::Error,
}

impl AppError {
    pub fn new(inner: playgate_core::Error) -> Self {
        Self { inner }
    }
}

impl From<playgate_core::Error> for AppError {
    fn from(e: playgate_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            playgate_core::Error::NotFound { .. } => "not_found",
            playgate_core::Error::Unauthorized(_) => "unauthorized",
            playgate_core::Error::Validation(_) => "validation_error",
            playgate_core::Error::Io { .. } => "io_error",
            playgate_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
