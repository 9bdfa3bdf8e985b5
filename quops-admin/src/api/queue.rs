//! Moderation queue endpoints
//!
//! Lists the rows awaiting a decision and applies per-item approve and
//! reject actions. All routes here sit behind the session check.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::ApiError;
use crate::AppState;
use quops_common::db::models::Submission;
use quops_common::moderation;

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub total: usize,
    pub items: Vec<Submission>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApproveRequest {
    /// Optional reviewer feedback recorded on the row
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub id: i64,
    pub status: String,
}

/// GET /api/queue
pub async fn get_queue(State(state): State<AppState>) -> Result<Json<QueueResponse>, ApiError> {
    let items = moderation::moderation_queue(&state.db).await.map_err(|e| {
        error!("Queue query failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(QueueResponse {
        total: items.len(),
        items,
    }))
}

/// POST /api/queue/:id/approve
///
/// Promotes a pending submission, or resolves an update proposal by
/// atomically retiring the prior approved row for the same reference.
pub async fn approve_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ApproveRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let status = moderation::approve(&state.db, id, request.feedback)
        .await
        .map_err(|e| {
            error!("Approve of submission {} failed: {}", id, e);
            ApiError::from(e)
        })?;

    Ok(Json(DecisionResponse {
        id,
        status: status.as_str().to_string(),
    }))
}

/// POST /api/queue/:id/reject
///
/// Deletes the row; it never reappears in the queue or any public view.
pub async fn reject_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DecisionResponse>, ApiError> {
    moderation::reject(&state.db, id).await.map_err(|e| {
        error!("Reject of submission {} failed: {}", id, e);
        ApiError::from(e)
    })?;

    Ok(Json(DecisionResponse {
        id,
        status: "REJECTED".to_string(),
    }))
}
