//! Database ingestion path
//!
//! Reads the APPROVED submissions and reshapes them into the shared
//! display schema. Unlike the sheet path the columns are already unique;
//! `Computation` and `Error mitigation` are single list-valued columns,
//! carried as JSON text so the filter engine can intersect them.

use super::normalize::{add_year_column, apply_sentinels, NO_DATA};
use super::{columns, Dataset, RawTable, SourceShape};
use crate::moderation;
use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, error};

/// Load and normalize the approved dataset from the submissions table
pub async fn load_database(pool: &SqlitePool) -> Result<Dataset> {
    let approved = moderation::approved_rows(pool).await.map_err(|e| {
        error!("Failed to load approved submissions: {}", e);
        e
    })?;

    let mut table = RawTable {
        columns: vec![
            columns::REFERENCE.to_string(),
            columns::DATE.to_string(),
            columns::COMPUTATION.to_string(),
            columns::NUM_QUBITS.to_string(),
            columns::NUM_2Q_GATES.to_string(),
            columns::NUM_1Q_GATES.to_string(),
            columns::TOTAL_GATES.to_string(),
            columns::CIRCUIT_DEPTH.to_string(),
            columns::CIRCUIT_DEPTH_MEASURE.to_string(),
            columns::INSTITUTION.to_string(),
            columns::COMPUTER.to_string(),
            columns::ERROR_MITIGATION.to_string(),
        ],
        rows: Vec::with_capacity(approved.len()),
    };

    let mut computations = Vec::with_capacity(approved.len());
    let mut mitigations = Vec::with_capacity(approved.len());

    for row in &approved {
        // Empty mitigation lists become the sentinel list, matching the
        // multi-column shape's "No Data" cells
        let mitigation_list: Vec<String> = if row.error_mitigation.is_empty() {
            vec![NO_DATA.to_string()]
        } else {
            row.error_mitigation.clone()
        };

        computations.push(Some(row.computation.join(", ")));
        mitigations.push(Some(mitigation_list.join(", ")));

        table.rows.push(vec![
            Some(row.reference.clone()),
            row.date.clone(),
            Some(serde_json::to_string(&row.computation).unwrap_or_else(|_| "[]".to_string())),
            row.num_qubits.map(|v| v.to_string()),
            row.num_2q_gates.map(|v| v.to_string()),
            row.num_1q_gates.map(|v| v.to_string()),
            row.total_gates.map(|v| v.to_string()),
            row.circuit_depth.map(|v| v.to_string()),
            row.circuit_depth_measure.clone(),
            row.institution.clone(),
            row.computer.clone(),
            Some(
                serde_json::to_string(&mitigation_list).unwrap_or_else(|_| "[]".to_string()),
            ),
        ]);
    }

    add_year_column(&mut table).map_err(|e| {
        error!("Failed to derive Year column: {}", e);
        e
    })?;
    table.push_column(columns::COMPUTATIONS, computations);
    table.push_column(columns::ERROR_MITIGATIONS, mitigations);
    apply_sentinels(&mut table);

    debug!("Normalized database table: {} rows", table.rows.len());
    Ok(Dataset {
        shape: SourceShape::Database,
        table,
    })
}
