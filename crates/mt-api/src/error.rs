//! Maps `AppError` onto HTTP responses with an `{"error": ...}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mt_core::AppError;
use serde_json::json;

/// Message for a missing, empty or non-object request body.
pub const NO_DATA: &str = "No data provided";

/// Message for a body over `server.max_body_bytes`.
pub const TOO_LARGE: &str = "Request body too large";

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Io(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            AppError::NotFound(entity, _) => format!("{entity} not found"),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::PayloadTooLarge(detail) => {
                tracing::warn!(detail = %detail, "request body rejected");
                TOO_LARGE.to_string()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
