//! Table normalization
//!
//! Turns a raw table with duplicate column names and multi-valued fields
//! into a clean schema: unique column names, a derived Year, combined
//! comma-joined columns for each duplicate family, and sentinel defaults
//! for missing values. Any failure is logged and re-raised; callers must
//! not render partial data.

use super::{columns, RawTable};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, error};

/// Sentinel for missing institution/computer names
pub const UNNAMED: &str = "Unnamed";
/// Sentinel for missing error-mitigation entries
pub const NO_DATA: &str = "No Data";

/// Full normalization pipeline for the spreadsheet shape
pub fn normalize_sheet(mut table: RawTable) -> Result<RawTable> {
    let repeated = dedupe_columns(&mut table);
    add_year_column(&mut table).map_err(|e| {
        error!("Failed to derive Year column: {}", e);
        e
    })?;
    add_combined_columns(&mut table, &repeated);
    apply_sentinels(&mut table);
    debug!(
        "Normalized sheet table: {} columns, {} rows",
        table.columns.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Rename duplicate column names to make them unique
///
/// The first occurrence keeps its name; later ones get `_1`, `_2`, …
/// suffixes by occurrence index. Returns the duplicated base names in
/// first-occurrence order.
pub fn dedupe_columns(table: &mut RawTable) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut repeated = Vec::new();
    let mut new_columns = Vec::with_capacity(table.columns.len());

    for name in &table.columns {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            new_columns.push(name.clone());
        } else {
            if !repeated.contains(name) {
                repeated.push(name.clone());
            }
            new_columns.push(format!("{}_{}", name, count));
        }
        *count += 1;
    }

    table.columns = new_columns;
    repeated
}

/// Name of the combined column derived from a duplicate family
pub fn combined_name(base: &str) -> String {
    if base.ends_with('s') {
        format!("{}_combined", base)
    } else {
        format!("{}s", base)
    }
}

/// Whether `column` belongs to the duplicate family of `base`
/// (the base itself or `base_<n>`)
pub fn in_family(column: &str, base: &str) -> bool {
    if column == base {
        return true;
    }
    column
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('_'))
        .map_or(false, |n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// Derive the Year column from the Date column
///
/// Unparseable dates become missing values, never an error; a table with
/// no Date column at all is malformed.
pub fn add_year_column(table: &mut RawTable) -> Result<()> {
    let date_col = table
        .column_index(columns::DATE)
        .ok_or_else(|| Error::Transform("Input table has no Date column".to_string()))?;

    let years: Vec<Option<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.get(date_col)
                .and_then(|c| c.as_deref())
                .and_then(parse_date)
                .map(|d| d.year().to_string())
        })
        .collect();

    table.push_column(columns::YEAR, years);
    Ok(())
}

/// Parse a date cell in the formats the source forms produce
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    // Timestamp-style cells keep a time suffix; take the date part
    if let Some((date_part, _)) = text.split_once(' ') {
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    None
}

/// For every duplicate family, append a combined column joining all
/// non-missing values in declared column order
pub fn add_combined_columns(table: &mut RawTable, repeated: &[String]) {
    for base in repeated {
        let member_indexes: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| in_family(name, base))
            .map(|(i, _)| i)
            .collect();

        let combined: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| {
                let joined = member_indexes
                    .iter()
                    .filter_map(|&i| row.get(i).and_then(|c| c.as_deref()))
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(joined)
            })
            .collect();

        table.push_column(&combined_name(base), combined);
    }
}

/// Apply sentinel defaults after all derivation
///
/// Institution is whitespace-trimmed, then blank/missing institution and
/// computer become "Unnamed"; blank/missing cells in every Error
/// mitigation family column and in the combined Error mitigations column
/// become "No Data".
pub fn apply_sentinels(table: &mut RawTable) {
    let targets: Vec<(usize, &'static str, bool)> = table
        .columns
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            if name == columns::INSTITUTION {
                Some((i, UNNAMED, true))
            } else if name == columns::COMPUTER {
                Some((i, UNNAMED, false))
            } else if in_family(name, columns::ERROR_MITIGATION)
                || name == columns::ERROR_MITIGATIONS
            {
                Some((i, NO_DATA, false))
            } else {
                None
            }
        })
        .collect();

    for row in &mut table.rows {
        for &(col, sentinel, trim) in &targets {
            let cell = &mut row[col];
            if trim {
                if let Some(value) = cell.as_mut() {
                    *value = value.trim().to_string();
                }
            }
            let blank = match cell.as_deref() {
                None => true,
                Some(v) => {
                    let v = v.trim();
                    v.is_empty() || v == "[]"
                }
            };
            if blank {
                *cell = Some(sentinel.to_string());
            }
        }
    }
}
