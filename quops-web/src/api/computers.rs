//! Computer overview endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::ApiError;
use crate::AppState;
use quops_common::db::models::{list_quantum_computers, QuantumComputer};

#[derive(Debug, Serialize)]
pub struct ComputersResponse {
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub computers: Vec<QuantumComputer>,
}

/// GET /api/computers
///
/// Read-only overview of the quantum_computers reference table with the
/// quick-info counts the overview page shows.
pub async fn get_computers(
    State(state): State<AppState>,
) -> Result<Json<ComputersResponse>, ApiError> {
    let computers = list_quantum_computers(&state.db).await?;

    Ok(Json(ComputersResponse {
        total_rows: computers.len(),
        columns: vec![
            "institution".to_string(),
            "name".to_string(),
            "vendor".to_string(),
            "technology".to_string(),
            "num_qubits".to_string(),
            "notes".to_string(),
        ],
        computers,
    }))
}
