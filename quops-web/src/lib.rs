//! quops-web library - public dashboard service
//!
//! Serves the interactive scatter plot over the approved dataset, the
//! submission and update-proposal forms, the computer overview, and CSV
//! export. No authentication: everything here is read-only or lands in
//! the moderation queue.

use axum::Router;
use quops_common::config::DataSource;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Which ingestion path feeds the visualization
    pub source: DataSource,
}

impl AppState {
    pub fn new(db: SqlitePool, source: DataSource) -> Self {
        Self { db, source }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/options", get(api::get_filter_options))
        .route("/api/plot", post(api::get_plot_data))
        .route("/api/submissions", post(api::create_submission))
        .route("/api/update-requests", post(api::create_update_request))
        .route("/api/computers", get(api::get_computers))
        .route("/api/export.csv", get(api::export_dataset_csv))
        .route("/api/computers.csv", get(api::export_computers_csv))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
