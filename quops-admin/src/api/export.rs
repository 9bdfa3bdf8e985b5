//! CSV export of the approved dataset

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::ApiError;
use crate::AppState;
use quops_common::export::submissions_to_csv;
use quops_common::moderation::approved_rows;

/// GET /api/export.csv
pub async fn export_dataset_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = approved_rows(&state.db).await?;
    let body = submissions_to_csv(&rows);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"dataset.csv\"".to_string(),
            ),
        ],
        body,
    )
        .into_response())
}
