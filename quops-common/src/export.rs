//! Delimited-text export of table views
//!
//! Produces RFC-4180-style CSV: fields containing commas, quotes, or
//! newlines are quoted, quotes doubled. Missing cells export as empty
//! fields.

use crate::db::models::{QuantumComputer, Submission};

/// Render a generic column/row view as CSV text
pub fn to_csv(columns: &[String], rows: &[Vec<Option<String>>]) -> String {
    let mut out = String::new();
    write_record(&mut out, columns.iter().map(|c| c.as_str()));
    for row in rows {
        write_record(&mut out, row.iter().map(|c| c.as_deref().unwrap_or("")));
    }
    out
}

/// Export approved submissions in stored-column order
pub fn submissions_to_csv(rows: &[Submission]) -> String {
    let columns = [
        "id",
        "reference",
        "date",
        "computation",
        "num_qubits",
        "num_2q_gates",
        "num_1q_gates",
        "total_gates",
        "circuit_depth",
        "circuit_depth_measure",
        "institution",
        "computer",
        "error_mitigation",
        "status",
    ];

    let mut out = String::new();
    write_record(&mut out, columns.iter().copied());
    for row in rows {
        let fields = [
            row.id.to_string(),
            row.reference.clone(),
            row.date.clone().unwrap_or_default(),
            row.computation.join("; "),
            optional_number(row.num_qubits),
            optional_number(row.num_2q_gates),
            optional_number(row.num_1q_gates),
            optional_number(row.total_gates),
            optional_number(row.circuit_depth),
            row.circuit_depth_measure.clone().unwrap_or_default(),
            row.institution.clone().unwrap_or_default(),
            row.computer.clone().unwrap_or_default(),
            row.error_mitigation.join("; "),
            row.status.as_str().to_string(),
        ];
        write_record(&mut out, fields.iter().map(|f| f.as_str()));
    }
    out
}

/// Export the computer metadata table
pub fn computers_to_csv(rows: &[QuantumComputer]) -> String {
    let columns = ["id", "institution", "name", "vendor", "technology", "num_qubits", "notes"];

    let mut out = String::new();
    write_record(&mut out, columns.iter().copied());
    for row in rows {
        let fields = [
            row.id.to_string(),
            row.institution.clone(),
            row.name.clone(),
            row.vendor.clone().unwrap_or_default(),
            row.technology.clone().unwrap_or_default(),
            optional_number(row.num_qubits),
            row.notes.clone().unwrap_or_default(),
        ];
        write_record(&mut out, fields.iter().map(|f| f.as_str()));
    }
    out
}

fn optional_number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(field));
    }
    out.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
