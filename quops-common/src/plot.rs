//! Plot data assembly: filtering, bubble sizing, axis configuration
//!
//! Produces the JSON payload the browser-side renderer consumes. The
//! server never mutates data for log scaling; it only flags the axes.

use crate::ingest::{columns, normalize::parse_date, Dataset, SourceShape};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Fields selectable for the y axis
pub const Y_AXIS_FIELDS: [&str; 4] = [
    columns::NUM_2Q_GATES,
    columns::NUM_1Q_GATES,
    columns::TOTAL_GATES,
    columns::CIRCUIT_DEPTH,
];

/// Fields selectable for the bubble size (y-axis fields plus Date)
pub const SIZE_FIELDS: [&str; 5] = [
    columns::NUM_2Q_GATES,
    columns::NUM_1Q_GATES,
    columns::TOTAL_GATES,
    columns::CIRCUIT_DEPTH,
    columns::DATE,
];

/// The known error-mitigation methods offered as filter choices
pub const ERROR_MITIGATION_METHODS: [&str; 8] = [
    "Bitstring postselection",
    "Dynamical decoupling",
    "Floquet calibration",
    "Pauli twirling",
    "Probabilistic error amplification",
    "Readout error mitigation",
    "Zero noise extrapolation",
    "No Data",
];

/// Bubble size range for the date transform
const SIZE_MIN: f64 = 10.0;
const SIZE_SPAN: f64 = 50.0;
const SIZE_MAX: f64 = SIZE_MIN + SIZE_SPAN;

/// Categorical filters plus axis configuration for one plot request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotRequest {
    pub institutions: Vec<String>,
    pub computers: Vec<String>,
    pub years: Vec<i32>,
    pub error_mitigation: Vec<String>,
    pub y_axis: String,
    pub size_field: String,
    #[serde(default)]
    pub log_x: bool,
    #[serde(default)]
    pub log_y: bool,
}

/// One scatter point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub computer: String,
    pub reference: String,
    pub year: Option<i32>,
    pub error_mitigations: String,
    pub computations: String,
    pub date: Option<String>,
}

/// Assembled plot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotData {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub log_x: bool,
    pub log_y: bool,
    pub points: Vec<PlotPoint>,
}

/// Filter choices offered to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptions {
    pub institutions: Vec<String>,
    pub computers: Vec<String>,
    pub years: Vec<i32>,
    pub error_mitigation_methods: Vec<String>,
    pub y_axis_fields: Vec<String>,
    pub size_fields: Vec<String>,
}

/// Build the plot payload for a request against the normalized dataset
pub fn build_plot(dataset: &Dataset, request: &PlotRequest) -> Result<PlotData> {
    if !Y_AXIS_FIELDS.contains(&request.y_axis.as_str()) {
        return Err(Error::InvalidInput(format!(
            "Unknown y-axis field: {:?}",
            request.y_axis
        )));
    }
    if !SIZE_FIELDS.contains(&request.size_field.as_str()) {
        return Err(Error::InvalidInput(format!(
            "Unknown size field: {:?}",
            request.size_field
        )));
    }

    // Date sizes are rescaled against the whole dataset's date span, not
    // just the filtered rows
    let date_span = if request.size_field == columns::DATE {
        Some(dataset_date_span(dataset)?)
    } else {
        None
    };

    let table = &dataset.table;
    let mut points = Vec::new();

    for row in 0..table.rows.len() {
        if !row_matches(dataset, row, request) {
            continue;
        }

        let x = match numeric_cell(table.cell(row, columns::NUM_QUBITS)) {
            Some(v) => v,
            None => continue,
        };
        let y = match numeric_cell(table.cell(row, &request.y_axis)) {
            Some(v) => v,
            None => continue,
        };

        // Rows missing the size value are dropped, not rendered at zero
        let size = match &date_span {
            Some(span) => match table.cell(row, columns::DATE).and_then(parse_date) {
                Some(date) => date_bubble_size(date, span.0, span.1),
                None => continue,
            },
            None => match numeric_cell(table.cell(row, &request.size_field)) {
                Some(v) => v,
                None => continue,
            },
        };

        points.push(PlotPoint {
            x,
            y,
            size,
            computer: table
                .cell(row, columns::COMPUTER)
                .unwrap_or_default()
                .to_string(),
            reference: table
                .cell(row, columns::REFERENCE)
                .unwrap_or_default()
                .to_string(),
            year: table
                .cell(row, columns::YEAR)
                .and_then(|y| y.parse().ok()),
            error_mitigations: table
                .cell(row, columns::ERROR_MITIGATIONS)
                .unwrap_or_default()
                .to_string(),
            computations: table
                .cell(row, columns::COMPUTATIONS)
                .unwrap_or_default()
                .to_string(),
            date: table.cell(row, columns::DATE).map(|d| d.to_string()),
        });
    }

    Ok(PlotData {
        title: format!("{} vs {}", request.y_axis, columns::NUM_QUBITS),
        x_title: columns::NUM_QUBITS.to_string(),
        y_title: request.y_axis.clone(),
        log_x: request.log_x,
        log_y: request.log_y,
        points,
    })
}

/// Whether a row passes all categorical filters
pub fn row_matches(dataset: &Dataset, row: usize, request: &PlotRequest) -> bool {
    let table = &dataset.table;

    let institution = table.cell(row, columns::INSTITUTION).unwrap_or_default();
    if !request.institutions.iter().any(|i| i == institution) {
        return false;
    }

    let computer = table.cell(row, columns::COMPUTER).unwrap_or_default();
    if !request.computers.iter().any(|c| c == computer) {
        return false;
    }

    match table.cell(row, columns::YEAR).and_then(|y| y.parse::<i32>().ok()) {
        Some(year) if request.years.contains(&year) => {}
        _ => return false,
    }

    mitigation_matches(dataset, row, &request.error_mitigation)
}

/// Error-mitigation matching branches on the dataset shape:
/// the sheet shape asks whether ANY flattened column equals a selected
/// value; the database shape intersects the JSON list with the selection.
fn mitigation_matches(dataset: &Dataset, row: usize, selected: &[String]) -> bool {
    let table = &dataset.table;
    match dataset.shape {
        SourceShape::Sheet => table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                crate::ingest::normalize::in_family(name, columns::ERROR_MITIGATION)
            })
            .any(|(col, _)| match table.rows[row][col].as_deref() {
                Some(value) => selected.iter().any(|s| s == value),
                None => false,
            }),
        SourceShape::Database => {
            let cell = table.cell(row, columns::ERROR_MITIGATION).unwrap_or("[]");
            let methods: Vec<String> = serde_json::from_str(cell)
                .unwrap_or_else(|_| vec![cell.to_string()]);
            methods
                .iter()
                .any(|m| selected.iter().any(|s| s == m))
        }
    }
}

/// Linearly rescale a date into the bubble-size range, clamped
pub fn date_bubble_size(
    date: chrono::NaiveDate,
    min: chrono::NaiveDate,
    max: chrono::NaiveDate,
) -> f64 {
    let total = (max - min).num_days();
    if total <= 0 {
        return SIZE_MIN;
    }
    let elapsed = (date - min).num_days() as f64;
    let size = SIZE_MIN + SIZE_SPAN * (elapsed / total as f64);
    size.clamp(SIZE_MIN, SIZE_MAX)
}

/// Min and max parseable dates in the dataset
fn dataset_date_span(
    dataset: &Dataset,
) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let table = &dataset.table;
    let mut span: Option<(chrono::NaiveDate, chrono::NaiveDate)> = None;

    for row in 0..table.rows.len() {
        if let Some(date) = table.cell(row, columns::DATE).and_then(parse_date) {
            span = Some(match span {
                None => (date, date),
                Some((min, max)) => (min.min(date), max.max(date)),
            });
        }
    }

    span.ok_or_else(|| {
        Error::InvalidInput("No parseable dates available for date-driven sizing".to_string())
    })
}

/// The filter choices for the UI; computer choices depend on the
/// currently selected institutions
pub fn filter_options(dataset: &Dataset, selected_institutions: Option<&[String]>) -> FilterOptions {
    let table = &dataset.table;
    let mut institutions = Vec::new();
    let mut computers = Vec::new();
    let mut years = Vec::new();

    for row in 0..table.rows.len() {
        let institution = table
            .cell(row, columns::INSTITUTION)
            .unwrap_or_default()
            .to_string();
        if !institution.is_empty() && !institutions.contains(&institution) {
            institutions.push(institution.clone());
        }

        let in_selection = match selected_institutions {
            Some(selected) => selected.iter().any(|s| *s == institution),
            None => true,
        };
        if in_selection {
            if let Some(computer) = table.cell(row, columns::COMPUTER) {
                if !computers.contains(&computer.to_string()) {
                    computers.push(computer.to_string());
                }
            }
        }

        if let Some(year) = table.cell(row, columns::YEAR).and_then(|y| y.parse().ok()) {
            if !years.contains(&year) {
                years.push(year);
            }
        }
    }

    years.sort_unstable();

    FilterOptions {
        institutions,
        computers,
        years,
        error_mitigation_methods: ERROR_MITIGATION_METHODS
            .iter()
            .map(|m| m.to_string())
            .collect(),
        y_axis_fields: Y_AXIS_FIELDS.iter().map(|f| f.to_string()).collect(),
        size_fields: SIZE_FIELDS.iter().map(|f| f.to_string()).collect(),
    }
}

fn numeric_cell(cell: Option<&str>) -> Option<f64> {
    cell.and_then(|v| v.trim().parse::<f64>().ok())
}
