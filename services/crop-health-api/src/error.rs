//! HTTP mapping of [`FieldError`].

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use field_common::FieldError;

/// JSON error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// A [`FieldError`] returned from a handler.
#[derive(Debug)]
pub struct ApiError(pub FieldError);

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.0.code(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(code = self.0.code(), error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code(),
        };
        let json = serde_json::to_string(&body).unwrap_or_default();

        (status, [(header::CONTENT_TYPE, "application/json")], json).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
