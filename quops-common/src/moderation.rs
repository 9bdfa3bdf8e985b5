//! Moderation workflow: submission lifecycle and store operations
//!
//! A submitted record is created as PENDING (new data point) or
//! UPDATE_REQUESTED (edit proposal against an existing reference). An
//! administrator approves, rejects, or directly edits it. Rejection is
//! physical deletion. Approving an update retires the prior APPROVED row
//! for the same reference inside one transaction, so no concurrent read
//! can observe zero approved rows for that reference mid-transition.

use crate::db::models::{to_json_list, Submission};
use crate::forms::{SubmissionInput, UpdateProposal};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Moderation status of a submission row
///
/// REJECTED is terminal and implemented as deletion, so it never appears
/// as a stored value. Unknown strings in the status column are an error,
/// never silently passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    UpdateRequested,
    Approved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::UpdateRequested => "UPDATE_REQUESTED",
            Status::Approved => "APPROVED",
        }
    }

    pub fn parse(s: &str) -> Result<Status> {
        match s {
            "PENDING" => Ok(Status::Pending),
            "UPDATE_REQUESTED" => Ok(Status::UpdateRequested),
            "APPROVED" => Ok(Status::Approved),
            other => Err(Error::Internal(format!("Unknown status value: {:?}", other))),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert a validated new submission with status PENDING
pub async fn submit(pool: &SqlitePool, input: &SubmissionInput) -> Result<i64> {
    let result = insert_row(pool, input, Status::Pending, None).await?;
    info!("New submission {} for reference {:?}", result, input.reference);
    Ok(result)
}

/// Insert a validated edit proposal as a new UPDATE_REQUESTED row
///
/// The existing APPROVED row for the reference is untouched until the
/// proposal is resolved. Proposals against a reference with no approved
/// row are rejected.
pub async fn propose_update(pool: &SqlitePool, proposal: &UpdateProposal) -> Result<i64> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM submissions WHERE reference = ? AND status = 'APPROVED')",
    )
    .bind(&proposal.fields.reference)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(Error::NotFound(format!(
            "No approved record for reference {:?}",
            proposal.fields.reference
        )));
    }

    let id = insert_row(
        pool,
        &proposal.fields,
        Status::UpdateRequested,
        Some(proposal.justification.as_str()),
    )
    .await?;
    info!(
        "Update proposal {} for reference {:?}",
        id, proposal.fields.reference
    );
    Ok(id)
}

async fn insert_row(
    pool: &SqlitePool,
    input: &SubmissionInput,
    status: Status,
    feedback: Option<&str>,
) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO submissions (
            reference, date, computation, num_qubits, num_2q_gates, num_1q_gates,
            total_gates, circuit_depth, circuit_depth_measure, institution, computer,
            error_mitigation, status, feedback
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.reference.trim())
    .bind(&input.date)
    .bind(to_json_list(&input.computation))
    .bind(input.num_qubits)
    .bind(input.num_2q_gates)
    .bind(input.num_1q_gates)
    .bind(input.total_gates)
    .bind(input.circuit_depth)
    .bind(&input.circuit_depth_measure)
    .bind(input.institution.trim())
    .bind(input.computer.trim())
    .bind(to_json_list(&input.error_mitigation))
    .bind(status.as_str())
    .bind(feedback)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Approve a submission
///
/// PENDING rows are promoted in place. For UPDATE_REQUESTED rows, any
/// APPROVED row sharing the reference is deleted and the proposal promoted
/// inside a single transaction. Approving an already-APPROVED row is a
/// no-op, so a retried approval converges on the same end state: exactly
/// one APPROVED row for the reference.
pub async fn approve(pool: &SqlitePool, id: i64, feedback: Option<String>) -> Result<Status> {
    let row = sqlx::query("SELECT reference, status FROM submissions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Submission {} not found", id)))?;

    let reference: String = row.get("reference");
    let status = Status::parse(&row.get::<String, _>("status"))?;

    match status {
        Status::Approved => Ok(Status::Approved),
        Status::Pending => {
            sqlx::query("UPDATE submissions SET status = 'APPROVED', feedback = COALESCE(?, feedback) WHERE id = ?")
                .bind(&feedback)
                .bind(id)
                .execute(pool)
                .await?;
            info!("Approved submission {} ({:?})", id, reference);
            Ok(Status::Approved)
        }
        Status::UpdateRequested => {
            let mut tx = pool.begin().await?;
            sqlx::query(
                "DELETE FROM submissions WHERE reference = ? AND status = 'APPROVED' AND id <> ?",
            )
            .bind(&reference)
            .bind(id)
            .execute(&mut *tx)
            .await?;
            sqlx::query("UPDATE submissions SET status = 'APPROVED', feedback = COALESCE(?, feedback) WHERE id = ?")
                .bind(&feedback)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            info!("Approved update {} for reference {:?}", id, reference);
            Ok(Status::Approved)
        }
    }
}

/// Reject (delete) a submission; the row never reappears in any view
pub async fn reject(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Submission {} not found", id)));
    }
    info!("Rejected and deleted submission {}", id);
    Ok(())
}

/// Admin direct edit: update a row's fields in place and set it APPROVED
///
/// Runs in a transaction that also retires any other APPROVED row with
/// the same reference, so the one-approved-row-per-reference invariant
/// holds even when a pending row is edited straight to approval.
pub async fn direct_edit(pool: &SqlitePool, id: i64, input: &SubmissionInput) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM submissions WHERE reference = ? AND status = 'APPROVED' AND id <> ?")
        .bind(input.reference.trim())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query(
        r#"
        UPDATE submissions SET
            reference = ?, date = ?, computation = ?, num_qubits = ?,
            num_2q_gates = ?, num_1q_gates = ?, total_gates = ?, circuit_depth = ?,
            circuit_depth_measure = ?, institution = ?, computer = ?,
            error_mitigation = ?, status = 'APPROVED'
        WHERE id = ?
        "#,
    )
    .bind(input.reference.trim())
    .bind(&input.date)
    .bind(to_json_list(&input.computation))
    .bind(input.num_qubits)
    .bind(input.num_2q_gates)
    .bind(input.num_1q_gates)
    .bind(input.total_gates)
    .bind(input.circuit_depth)
    .bind(&input.circuit_depth_measure)
    .bind(input.institution.trim())
    .bind(input.computer.trim())
    .bind(to_json_list(&input.error_mitigation))
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(Error::NotFound(format!("Submission {} not found", id)));
    }

    tx.commit().await?;
    info!("Direct edit of submission {}", id);
    Ok(())
}

/// Rows awaiting administrator decision, in creation order
pub async fn moderation_queue(pool: &SqlitePool) -> Result<Vec<Submission>> {
    let rows = sqlx::query(
        "SELECT * FROM submissions WHERE status IN ('PENDING', 'UPDATE_REQUESTED') ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    rows.iter().map(Submission::from_row).collect()
}

/// The approved (publicly visible) rows, in creation order
pub async fn approved_rows(pool: &SqlitePool) -> Result<Vec<Submission>> {
    let rows = sqlx::query("SELECT * FROM submissions WHERE status = 'APPROVED' ORDER BY id")
        .fetch_all(pool)
        .await?;
    rows.iter().map(Submission::from_row).collect()
}

/// Fetch one submission by id
pub async fn get_submission(pool: &SqlitePool, id: i64) -> Result<Option<Submission>> {
    let row = sqlx::query("SELECT * FROM submissions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(Submission::from_row).transpose()
}
