//! Ingestion: raw table loading and normalization
//!
//! Two paths feed the visualization dataset: a spreadsheet CSV export
//! (duplicate multi-valued columns, banner header row) and a direct read
//! of the approved submissions. Both end in the same normalized column
//! set, but the error-mitigation representation differs, so the dataset
//! carries a shape marker the filter engine branches on.

pub mod database;
pub mod normalize;
pub mod sheet;

use crate::config::DataSource;
use crate::Result;
use sqlx::SqlitePool;

/// Display column names shared by both ingestion paths
pub mod columns {
    pub const REFERENCE: &str = "Reference";
    pub const DATE: &str = "Date";
    pub const COMPUTATION: &str = "Computation";
    pub const NUM_QUBITS: &str = "Number of qubits";
    pub const NUM_2Q_GATES: &str = "Number of two-qubit gates";
    pub const NUM_1Q_GATES: &str = "Number of single-qubit gates";
    pub const TOTAL_GATES: &str = "Total number of gates";
    pub const CIRCUIT_DEPTH: &str = "Circuit depth";
    pub const CIRCUIT_DEPTH_MEASURE: &str = "Circuit depth measure";
    pub const INSTITUTION: &str = "Institution";
    pub const COMPUTER: &str = "Computer";
    pub const ERROR_MITIGATION: &str = "Error mitigation";
    pub const YEAR: &str = "Year";
    pub const COMPUTATIONS: &str = "Computations";
    pub const ERROR_MITIGATIONS: &str = "Error mitigations";
}

/// A raw tabular payload; missing cells are `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Index of the first column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Append a derived column; `values` must have one entry per row
    pub fn push_column(&mut self, name: &str, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }
}

/// Which ingestion path produced a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// Spreadsheet export: several flattened `Error mitigation*` columns
    Sheet,
    /// Database read: one list-valued `Error mitigation` column
    Database,
}

/// A normalized table plus its shape marker
#[derive(Debug, Clone)]
pub struct Dataset {
    pub shape: SourceShape,
    pub table: RawTable,
}

/// Load and normalize the dataset from the configured source
pub async fn load_dataset(pool: &SqlitePool, source: &DataSource) -> Result<Dataset> {
    match source {
        DataSource::Sheet { sheet_id } => sheet::load_sheet(sheet_id).await,
        DataSource::Database => database::load_database(pool).await,
    }
}
