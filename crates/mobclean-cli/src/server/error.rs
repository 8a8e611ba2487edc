//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mobclean::CleanerError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Unknown upload id.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Request out of order (download before process).
    Conflict(String),
    /// Internal server error.
    Internal(String),
    /// Error from the mobclean library.
    Cleaner(CleanerError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
            ApiError::Cleaner(e @ CleanerError::MissingColumn { .. }) => {
                (StatusCode::BAD_REQUEST, "missing_column", e.to_string())
            }
            ApiError::Cleaner(e) => (StatusCode::BAD_REQUEST, "invalid_file", e.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

impl From<CleanerError> for ApiError {
    fn from(err: CleanerError) -> Self {
        ApiError::Cleaner(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Cleaner(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {}
