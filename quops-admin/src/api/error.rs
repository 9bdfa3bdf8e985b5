//! HTTP error mapping for the moderation service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quops_common::forms::FieldError;
use serde_json::json;

/// API error for admin handlers
#[derive(Debug)]
pub enum ApiError {
    /// Session is not authenticated for a protected route
    NotAuthenticated,
    /// Login failed; one generic message for unknown-user and
    /// wrong-password alike
    BadCredentials,
    /// Per-field form validation failures
    Validation(Vec<FieldError>),
    /// Malformed request parameter
    BadRequest(String),
    /// Target row or table does not exist
    NotFound(String),
    /// Database failure; the operation was aborted
    Internal(String),
}

impl From<quops_common::Error> for ApiError {
    fn from(err: quops_common::Error) -> Self {
        use quops_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Not authenticated" }),
            ),
            ApiError::BadCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid username or password" }),
            ),
            ApiError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "errors": errors }))
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}
