//! API error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Handler-level failures, mapped onto HTTP statuses with a structured
/// JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The requested test does not exist in the backend.
    #[error("test not found: {0}")]
    NotFound(String),

    /// Anything else that kept the request from completing.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
