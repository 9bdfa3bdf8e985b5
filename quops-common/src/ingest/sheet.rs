//! Spreadsheet-export ingestion path
//!
//! Fetches the CSV export of the source spreadsheet and parses it into a
//! raw table. The export carries two header rows: a banner row from the
//! multi-level form header (discarded) and the real column names, which
//! may contain duplicates for multi-valued fields.

use super::normalize::normalize_sheet;
use super::{Dataset, RawTable, SourceShape};
use crate::config::sheet_export_url;
use crate::{Error, Result};
use tracing::{debug, error};

/// Fetch and normalize the spreadsheet dataset
pub async fn load_sheet(sheet_id: &str) -> Result<Dataset> {
    let url = sheet_export_url(sheet_id);
    debug!("Fetching sheet export: {}", url);

    let response = reqwest::get(&url).await?.error_for_status()?;
    let text = response.text().await?;

    let table = parse_sheet_csv(&text).map_err(|e| {
        error!("Failed to parse sheet export: {}", e);
        e
    })?;

    let table = normalize_sheet(table)?;
    Ok(Dataset {
        shape: SourceShape::Sheet,
        table,
    })
}

/// Parse the CSV export into a raw table, discarding the banner row
pub fn parse_sheet_csv(text: &str) -> Result<RawTable> {
    let mut records = parse_csv(text);
    if records.len() < 2 {
        return Err(Error::Transform(
            "Sheet export has no header rows".to_string(),
        ));
    }

    // Row 0 is the banner/group row of the multi-level header
    records.remove(0);
    let header = records.remove(0);
    let width = header.len();

    let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_string()).collect();
    let rows = records
        .into_iter()
        .map(|mut record| {
            record.resize(width, String::new());
            record
                .into_iter()
                .take(width)
                .map(|cell| {
                    let cell = cell.trim();
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect()
        })
        .collect();

    Ok(RawTable { columns, rows })
}

/// Minimal CSV record parser: quoted fields, doubled-quote escapes, CRLF
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
