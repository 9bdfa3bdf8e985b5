//! Plot data and filter option endpoints
//!
//! The dataset is loaded and normalized per request from the configured
//! source; a transformation failure blocks the view entirely.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::api::ApiError;
use crate::AppState;
use quops_common::ingest::load_dataset;
use quops_common::plot::{build_plot, filter_options, FilterOptions, PlotData, PlotRequest};

/// Query parameters for the filter-options endpoint
#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    /// Comma-separated institution selection; computer options offered
    /// depend on it
    pub institutions: Option<String>,
}

/// GET /api/options
pub async fn get_filter_options(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<FilterOptions>, ApiError> {
    let dataset = load_dataset(&state.db, &state.source).await.map_err(|e| {
        error!("Dataset load failed: {}", e);
        ApiError::from(e)
    })?;

    let selected: Option<Vec<String>> = query.institutions.map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    Ok(Json(filter_options(&dataset, selected.as_deref())))
}

/// POST /api/plot
pub async fn get_plot_data(
    State(state): State<AppState>,
    Json(request): Json<PlotRequest>,
) -> Result<Json<PlotData>, ApiError> {
    let dataset = load_dataset(&state.db, &state.source).await.map_err(|e| {
        error!("Dataset load failed: {}", e);
        ApiError::from(e)
    })?;

    let plot = build_plot(&dataset, &request)?;
    Ok(Json(plot))
}
