//! Login, logout, and the session capability check
//!
//! The session is an explicit two-state object held by the server; the
//! middleware gates every protected route on it. Credential failures use
//! one generic message so unknown-user and wrong-password are
//! indistinguishable to the caller.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::ApiError;
use crate::AppState;
use quops_common::auth::{verify_credentials, SessionState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

/// Capability check applied to every protected route
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.session().is_admin() {
        return Err(ApiError::NotAuthenticated);
    }
    Ok(next.run(request).await)
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let valid = verify_credentials(&state.db, &request.username, &request.password).await?;
    if !valid {
        warn!("Failed login attempt for user {:?}", request.username);
        return Err(ApiError::BadCredentials);
    }

    state.set_session(SessionState::AdminAuthenticated);
    info!("Admin login: {}", request.username);
    Ok(Json(SessionResponse {
        authenticated: true,
    }))
}

/// POST /api/logout
pub async fn logout(State(state): State<AppState>) -> Json<SessionResponse> {
    state.set_session(SessionState::Anonymous);
    info!("Admin logout");
    Json(SessionResponse {
        authenticated: false,
    })
}

/// GET /api/session
pub async fn session_status(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: state.session().is_admin(),
    })
}
