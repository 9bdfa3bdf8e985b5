//! HTTP error mapping
//!
//! Every failure is terminal for the triggering request: transformation
//! errors block the whole view (nothing partial is rendered), database
//! errors abort the operation with a visible message, and validation
//! failures are reported per-field before any database call.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quops_common::forms::FieldError;
use serde_json::json;

/// API error for public-service handlers
#[derive(Debug)]
pub enum ApiError {
    /// Per-field form validation failures (blocks the write)
    Validation(Vec<FieldError>),
    /// Malformed request parameter
    BadRequest(String),
    /// Referenced record does not exist
    NotFound(String),
    /// Database/ingestion failure; the operation was aborted
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
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": message })),
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}
