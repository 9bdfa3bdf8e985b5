//! quops-admin library - moderation service
//!
//! Admin-facing service: login gate, moderation queue with approve and
//! reject, direct row edit and delete, raw table browsing, and export.
//! Every write path sits behind the session capability check.

use axum::Router;
use quops_common::auth::SessionState;
use sqlx::SqlitePool;
use std::sync::{Arc, RwLock};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod pagination;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Server-held login state; no client tokens are issued
    session: Arc<RwLock<SessionState>>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            session: Arc::new(RwLock::new(SessionState::Anonymous)),
        }
    }

    /// Current session state
    pub fn session(&self) -> SessionState {
        *self.session.read().expect("session lock poisoned")
    }

    /// Transition the session state
    pub fn set_session(&self, state: SessionState) {
        *self.session.write().expect("session lock poisoned") = state;
    }
}

/// Build application router
///
/// Every moderation and table-mutation route requires the authenticated
/// session; login, logout, session status, health, and the UI itself are
/// public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let protected = Router::new()
        .route("/api/queue", get(api::get_queue))
        .route("/api/queue/:id/approve", post(api::approve_submission))
        .route("/api/queue/:id/reject", post(api::reject_submission))
        .route("/api/table/:name", get(api::get_table_data))
        .route(
            "/api/submissions/:id",
            put(api::edit_submission).delete(api::delete_submission),
        )
        .route("/api/export.csv", get(api::export_dataset_csv))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_admin,
        ));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .route("/api/session", get(api::session_status))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
