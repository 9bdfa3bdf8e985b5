//! Record models and row mapping
//!
//! Rows are mapped by hand from sqlite rows; the list-valued columns
//! (`computation`, `error_mitigation`) are stored as JSON arrays of strings.

use crate::moderation::Status;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};

/// One proposed or approved data point describing a quantum-computing
/// experiment's resource usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub reference: String,
    pub date: Option<String>,
    pub computation: Vec<String>,
    pub num_qubits: Option<i64>,
    pub num_2q_gates: Option<i64>,
    pub num_1q_gates: Option<i64>,
    pub total_gates: Option<i64>,
    pub circuit_depth: Option<i64>,
    pub circuit_depth_measure: Option<String>,
    pub institution: Option<String>,
    pub computer: Option<String>,
    pub error_mitigation: Vec<String>,
    pub status: Status,
    pub feedback: Option<String>,
    pub created_at: String,
}

impl Submission {
    /// Map a `SELECT * FROM submissions` row
    pub fn from_row(row: &SqliteRow) -> Result<Self> {
        let status_text: String = row.get("status");
        Ok(Submission {
            id: row.get("id"),
            reference: row.get("reference"),
            date: row.get("date"),
            computation: parse_json_list(row.get("computation"))?,
            num_qubits: row.get("num_qubits"),
            num_2q_gates: row.get("num_2q_gates"),
            num_1q_gates: row.get("num_1q_gates"),
            total_gates: row.get("total_gates"),
            circuit_depth: row.get("circuit_depth"),
            circuit_depth_measure: row.get("circuit_depth_measure"),
            institution: row.get("institution"),
            computer: row.get("computer"),
            error_mitigation: parse_json_list(row.get("error_mitigation"))?,
            status: Status::parse(&status_text)?,
            feedback: row.get("feedback"),
            created_at: row.get("created_at"),
        })
    }
}

/// Static metadata describing a known quantum computer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantumComputer {
    pub id: i64,
    pub institution: String,
    pub name: String,
    pub vendor: Option<String>,
    pub technology: Option<String>,
    pub num_qubits: Option<i64>,
    pub notes: Option<String>,
}

impl QuantumComputer {
    pub fn from_row(row: &SqliteRow) -> Self {
        QuantumComputer {
            id: row.get("id"),
            institution: row.get("institution"),
            name: row.get("name"),
            vendor: row.get("vendor"),
            technology: row.get("technology"),
            num_qubits: row.get("num_qubits"),
            notes: row.get("notes"),
        }
    }
}

/// Parse a JSON-array-of-strings column value
pub fn parse_json_list(value: Option<String>) -> Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| Error::Internal(format!("Malformed list column {:?}: {}", text, e))),
    }
}

/// Encode a list-valued field for storage
pub fn to_json_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Load all computer metadata rows, institution then name order
pub async fn list_quantum_computers(pool: &sqlx::SqlitePool) -> Result<Vec<QuantumComputer>> {
    let rows = sqlx::query("SELECT * FROM quantum_computers ORDER BY institution, name")
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(QuantumComputer::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_list_handles_missing_and_empty() {
        assert!(parse_json_list(None).unwrap().is_empty());
        assert!(parse_json_list(Some("".to_string())).unwrap().is_empty());
        assert_eq!(
            parse_json_list(Some(r#"["Pauli twirling"]"#.to_string())).unwrap(),
            vec!["Pauli twirling".to_string()]
        );
    }

    #[test]
    fn parse_json_list_rejects_garbage() {
        assert!(parse_json_list(Some("not json".to_string())).is_err());
    }
}
