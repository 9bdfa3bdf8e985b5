//! Integration tests for the moderation workflow against a scratch database

use quops_common::db::init_database;
use quops_common::forms::{SubmissionInput, UpdateProposal};
use quops_common::moderation::{
    approve, approved_rows, direct_edit, get_submission, moderation_queue, propose_update,
    reject, submit, Status,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("temp dir");
    let pool = init_database(&dir.path().join("quops.db"))
        .await
        .expect("init database");
    (dir, pool)
}

fn input(reference: &str) -> SubmissionInput {
    SubmissionInput {
        reference: reference.to_string(),
        date: Some("2023-06-14".to_string()),
        num_qubits: Some(5),
        num_2q_gates: Some(10),
        institution: "IBM".to_string(),
        computer: "Eagle".to_string(),
        error_mitigation: vec!["Pauli twirling".to_string()],
        ..Default::default()
    }
}

#[tokio::test]
async fn new_submission_is_pending_and_queued() {
    let (_dir, pool) = setup_db().await;

    let id = submit(&pool, &input("arXiv:1234")).await.unwrap();
    let row = get_submission(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, Status::Pending);
    assert_eq!(row.reference, "arXiv:1234");

    let queue = moderation_queue(&pool).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert!(approved_rows(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn approving_pending_row_publishes_it() {
    let (_dir, pool) = setup_db().await;

    let id = submit(&pool, &input("arXiv:1")).await.unwrap();
    let status = approve(&pool, id, None).await.unwrap();
    assert_eq!(status, Status::Approved);

    assert!(moderation_queue(&pool).await.unwrap().is_empty());
    let approved = approved_rows(&pool).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, id);
}

#[tokio::test]
async fn approving_update_replaces_prior_approved_row() {
    let (_dir, pool) = setup_db().await;

    let original = submit(&pool, &input("arXiv:1")).await.unwrap();
    approve(&pool, original, None).await.unwrap();

    let mut updated = input("arXiv:1");
    updated.num_2q_gates = Some(25);
    let proposal = UpdateProposal {
        fields: updated,
        justification: "gate count corrected in the published erratum".to_string(),
    };
    let proposal_id = propose_update(&pool, &proposal).await.unwrap();

    // The original approved row is untouched while the proposal is open
    let open = get_submission(&pool, proposal_id).await.unwrap().unwrap();
    assert_eq!(open.status, Status::UpdateRequested);
    assert!(open.feedback.as_deref().unwrap().contains("erratum"));
    assert_eq!(approved_rows(&pool).await.unwrap().len(), 1);

    approve(&pool, proposal_id, None).await.unwrap();

    // Exactly one approved row remains, and it is the new one
    let approved = approved_rows(&pool).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, proposal_id);
    assert_eq!(approved[0].num_2q_gates, Some(25));
    assert!(get_submission(&pool, original).await.unwrap().is_none());
}

#[tokio::test]
async fn retried_approval_is_idempotent() {
    let (_dir, pool) = setup_db().await;

    let original = submit(&pool, &input("arXiv:1")).await.unwrap();
    approve(&pool, original, None).await.unwrap();

    let proposal = UpdateProposal {
        fields: input("arXiv:1"),
        justification: "updated qubit count".to_string(),
    };
    let proposal_id = propose_update(&pool, &proposal).await.unwrap();

    approve(&pool, proposal_id, None).await.unwrap();
    approve(&pool, proposal_id, None).await.unwrap();

    assert_eq!(approved_rows(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn proposal_requires_an_approved_reference() {
    let (_dir, pool) = setup_db().await;

    let proposal = UpdateProposal {
        fields: input("arXiv:unknown"),
        justification: "does not matter".to_string(),
    };
    assert!(propose_update(&pool, &proposal).await.is_err());
}

#[tokio::test]
async fn rejected_row_disappears_everywhere() {
    let (_dir, pool) = setup_db().await;

    let id = submit(&pool, &input("arXiv:1")).await.unwrap();
    reject(&pool, id).await.unwrap();

    assert!(moderation_queue(&pool).await.unwrap().is_empty());
    assert!(get_submission(&pool, id).await.unwrap().is_none());

    // Rejecting again reports not-found
    assert!(reject(&pool, id).await.is_err());
}

#[tokio::test]
async fn direct_edit_approves_in_place() {
    let (_dir, pool) = setup_db().await;

    let id = submit(&pool, &input("arXiv:1")).await.unwrap();
    let mut edited = input("arXiv:1");
    edited.num_qubits = Some(7);
    direct_edit(&pool, id, &edited).await.unwrap();

    let row = get_submission(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, Status::Approved);
    assert_eq!(row.num_qubits, Some(7));
}

#[tokio::test]
async fn direct_edit_keeps_one_approved_row_per_reference() {
    let (_dir, pool) = setup_db().await;

    let first = submit(&pool, &input("arXiv:1")).await.unwrap();
    approve(&pool, first, None).await.unwrap();

    let second = submit(&pool, &input("arXiv:1")).await.unwrap();
    direct_edit(&pool, second, &input("arXiv:1")).await.unwrap();

    let approved = approved_rows(&pool).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, second);
}

#[tokio::test]
async fn approval_feedback_is_recorded() {
    let (_dir, pool) = setup_db().await;

    let id = submit(&pool, &input("arXiv:1")).await.unwrap();
    approve(&pool, id, Some("verified against the paper".to_string()))
        .await
        .unwrap();

    let row = get_submission(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.feedback.as_deref(), Some("verified against the paper"));
}
