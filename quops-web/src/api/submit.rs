//! Submission and update-proposal endpoints
//!
//! Validation runs before any database call; a failed write surfaces a
//! visible message and leaves no partial state.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use crate::api::ApiError;
use crate::AppState;
use quops_common::forms::{SubmissionInput, UpdateProposal};
use quops_common::moderation;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub status: String,
}

/// POST /api/submissions
///
/// Creates a new PENDING submission for the moderation queue.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(input): Json<SubmissionInput>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let errors = input.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let id = moderation::submit(&state.db, &input).await.map_err(|e| {
        error!("Submission insert failed: {}", e);
        ApiError::from(e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            status: moderation::Status::Pending.as_str().to_string(),
        }),
    ))
}

/// POST /api/update-requests
///
/// Creates an UPDATE_REQUESTED row proposing changes to an existing
/// approved reference; the approved row is untouched until resolution.
pub async fn create_update_request(
    State(state): State<AppState>,
    Json(proposal): Json<UpdateProposal>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let errors = proposal.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let id = moderation::propose_update(&state.db, &proposal)
        .await
        .map_err(|e| {
            error!("Update proposal insert failed: {}", e);
            ApiError::from(e)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            status: moderation::Status::UpdateRequested.as_str().to_string(),
        }),
    ))
}
