//! CSV export endpoints

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::ApiError;
use crate::AppState;
use quops_common::db::models::list_quantum_computers;
use quops_common::export::{computers_to_csv, submissions_to_csv};
use quops_common::moderation::approved_rows;

/// GET /api/export.csv
///
/// The current approved dataset as a downloadable delimited-text file.
pub async fn export_dataset_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = approved_rows(&state.db).await?;
    Ok(csv_download("dataset.csv", submissions_to_csv(&rows)))
}

/// GET /api/computers.csv
pub async fn export_computers_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let computers = list_quantum_computers(&state.db).await?;
    Ok(csv_download("computers.csv", computers_to_csv(&computers)))
}

fn csv_download(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}
