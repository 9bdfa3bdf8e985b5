//! Raw table browser with direct row edit and delete
//!
//! Browsable tables are allowlisted; the credential table is never
//! exposed. Sorting columns are validated against the table schema
//! before they reach the query text.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{Column, Row};
use tracing::error;

use crate::api::ApiError;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;
use quops_common::forms::SubmissionInput;
use quops_common::moderation;

/// Tables the browser may read
const BROWSABLE_TABLES: [&str; 2] = ["submissions", "quantum_computers"];

/// Query parameters for table viewing
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    /// Column to sort by (optional)
    pub sort: Option<String>,

    /// Sort order: "asc" or "desc"
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_page() -> i64 {
    1
}

fn default_order() -> String {
    "asc".to_string()
}

/// Table data response
#[derive(Debug, Serialize)]
pub struct TableDataResponse {
    pub table_name: String,
    pub total_rows: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// GET /api/table/:name
///
/// Returns paginated table data with optional sorting.
pub async fn get_table_data(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableDataResponse>, ApiError> {
    if !BROWSABLE_TABLES.contains(&table_name.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "Unknown table: {}",
            table_name
        )));
    }

    let total_rows: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table_name))
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;

    let p = calculate_pagination(total_rows, query.page);

    let mut sql = format!("SELECT * FROM {}", table_name);
    if let Some(sort_column) = &query.sort {
        let columns = table_columns(&state, &table_name).await?;
        if !columns.contains(sort_column) {
            return Err(ApiError::BadRequest(format!(
                "Unknown sort column: {}",
                sort_column
            )));
        }
        let order = if query.order.eq_ignore_ascii_case("desc") {
            "DESC"
        } else {
            "ASC"
        };
        sql.push_str(&format!(" ORDER BY {} {}", sort_column, order));
    }
    sql.push_str(&format!(" LIMIT {} OFFSET {}", PAGE_SIZE, p.offset));

    let rows = sqlx::query(&sql)
        .fetch_all(&state.db)
        .await
        .map_err(db_error)?;

    let columns: Vec<String> = if let Some(first_row) = rows.first() {
        first_row
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect()
    } else {
        table_columns(&state, &table_name).await?
    };

    let json_rows: Vec<Vec<Value>> = rows
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|i| {
                    row.try_get::<Option<i64>, _>(i)
                        .ok()
                        .flatten()
                        .map(|v| json!(v))
                        .or_else(|| {
                            row.try_get::<Option<f64>, _>(i)
                                .ok()
                                .flatten()
                                .map(|v| json!(v))
                        })
                        .or_else(|| {
                            row.try_get::<Option<String>, _>(i)
                                .ok()
                                .flatten()
                                .map(Value::String)
                        })
                        .unwrap_or(Value::Null)
                })
                .collect()
        })
        .collect();

    Ok(Json(TableDataResponse {
        table_name,
        total_rows,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        columns,
        rows: json_rows,
    }))
}

/// PUT /api/submissions/:id
///
/// Direct admin edit: validated fields are written in place and the row
/// becomes APPROVED without passing through the queue.
pub async fn edit_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<SubmissionInput>,
) -> Result<Json<Value>, ApiError> {
    let errors = input.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    moderation::direct_edit(&state.db, id, &input)
        .await
        .map_err(|e| {
            error!("Direct edit of submission {} failed: {}", id, e);
            ApiError::from(e)
        })?;

    Ok(Json(json!({ "id": id, "status": "APPROVED" })))
}

/// DELETE /api/submissions/:id
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    moderation::reject(&state.db, id).await.map_err(|e| {
        error!("Delete of submission {} failed: {}", id, e);
        ApiError::from(e)
    })?;

    Ok(Json(json!({ "id": id, "deleted": true })))
}

/// Get column names for a table via the schema
async fn table_columns(state: &AppState, table_name: &str) -> Result<Vec<String>, ApiError> {
    let rows = sqlx::query(&format!("PRAGMA table_info({})", table_name))
        .fetch_all(&state.db)
        .await
        .map_err(db_error)?;

    // PRAGMA table_info returns (cid, name, type, notnull, dflt_value, pk)
    Ok(rows.iter().map(|row| row.get::<String, _>(1)).collect())
}

fn db_error(e: sqlx::Error) -> ApiError {
    error!("Database error: {}", e);
    ApiError::Internal(format!("Database error: {}", e))
}
