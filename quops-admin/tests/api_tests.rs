//! Integration tests for the moderation service API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use quops_admin::{build_router, AppState};
use quops_common::auth::{generate_salt, hash_password};
use quops_common::db::init_database;
use quops_common::forms::SubmissionInput;
use quops_common::moderation;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

async fn setup() -> (TempDir, SqlitePool, axum::Router) {
    let dir = TempDir::new().expect("temp dir");
    let pool = init_database(&dir.path().join("quops.db"))
        .await
        .expect("init database");

    // Seed a known admin credential directly
    let salt = generate_salt();
    let hash = hash_password("hunter2", &salt);
    sqlx::query(
        "INSERT OR REPLACE INTO admin_users (username, password_hash, password_salt) VALUES (?, ?, ?)",
    )
        .bind("admin")
        .bind(&hash)
        .bind(&salt)
        .execute(&pool)
        .await
        .expect("seed admin");

    let state = AppState::new(pool.clone());
    (dir, pool, build_router(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn request_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn login(app: &axum::Router) {
    let response = app
        .clone()
        .oneshot(request_json(
            "POST",
            "/api/login",
            &json!({ "username": "admin", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

fn submission_input(reference: &str) -> SubmissionInput {
    SubmissionInput {
        reference: reference.to_string(),
        date: Some("2023-06-14".to_string()),
        num_qubits: Some(5),
        num_2q_gates: Some(10),
        institution: "IBM".to_string(),
        computer: "Eagle".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn protected_routes_require_login() {
    let (_dir, _pool, app) = setup().await;

    let response = app.clone().oneshot(get("/api/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/table/submissions"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_get_one_generic_message() {
    let (_dir, _pool, app) = setup().await;

    // Unknown user and wrong password produce identical bodies
    let unknown = app
        .clone()
        .oneshot(request_json(
            "POST",
            "/api/login",
            &json!({ "username": "nobody", "password": "hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = extract_json(unknown.into_body()).await;

    let wrong = app
        .oneshot(request_json(
            "POST",
            "/api/login",
            &json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = extract_json(wrong.into_body()).await;

    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn login_grants_access_and_logout_revokes_it() {
    let (_dir, _pool, app) = setup().await;
    login(&app).await;

    let response = app.clone().oneshot(get("/api/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request_json("POST", "/api/logout", &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn queue_lists_pending_and_update_requested_only() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    let pending = moderation::submit(&pool, &submission_input("arXiv:1"))
        .await
        .unwrap();
    let other = moderation::submit(&pool, &submission_input("arXiv:2"))
        .await
        .unwrap();
    moderation::approve(&pool, other, None).await.unwrap();

    let response = app.oneshot(get("/api/queue")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], pending);
    assert_eq!(body["items"][0]["status"], "PENDING");
}

#[tokio::test]
async fn approve_via_api_publishes_row() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    let id = moderation::submit(&pool, &submission_input("arXiv:1"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request_json(
            "POST",
            &format!("/api/queue/{}/approve", id),
            &json!({ "feedback": "looks right" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "APPROVED");

    let row = moderation::get_submission(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, moderation::Status::Approved);
    assert_eq!(row.feedback.as_deref(), Some("looks right"));
}

#[tokio::test]
async fn rejected_rows_never_reappear_in_the_queue() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    let id = moderation::submit(&pool, &submission_input("arXiv:1"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request_json(
            "POST",
            &format!("/api/queue/{}/reject", id),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/queue")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 0);
    assert!(moderation::get_submission(&pool, id).await.unwrap().is_none());

    // Rejecting again reports not-found
    let response = app
        .oneshot(request_json(
            "POST",
            &format!("/api/queue/{}/reject", id),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn table_browser_pages_and_sorts() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    for i in 0..3 {
        moderation::submit(&pool, &submission_input(&format!("arXiv:{}", i)))
            .await
            .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get("/api/table/submissions?page=1&sort=id&order=desc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["table_name"], "submissions");
    assert_eq!(body["total_rows"], 3);
    assert_eq!(body["page_size"], 50);
    let id_index = body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .position(|c| c == "id")
        .unwrap();
    let first_id = body["rows"][0][id_index].as_i64().unwrap();
    assert_eq!(first_id, 3);

    // Unknown table and unknown sort column are rejected
    let response = app
        .clone()
        .oneshot(get("/api/table/admin_users"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/table/submissions?sort=nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn direct_edit_validates_then_approves() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    let id = moderation::submit(&pool, &submission_input("arXiv:1"))
        .await
        .unwrap();

    // Invalid edit: missing qubit count
    let mut bad = serde_json::to_value(submission_input("arXiv:1")).unwrap();
    bad["num_qubits"] = Value::Null;
    let response = app
        .clone()
        .oneshot(request_json("PUT", &format!("/api/submissions/{}", id), &bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Valid edit lands as APPROVED
    let mut good = submission_input("arXiv:1");
    good.num_qubits = Some(9);
    let response = app
        .oneshot(request_json(
            "PUT",
            &format!("/api/submissions/{}", id),
            &serde_json::to_value(&good).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = moderation::get_submission(&pool, id).await.unwrap().unwrap();
    assert_eq!(row.status, moderation::Status::Approved);
    assert_eq!(row.num_qubits, Some(9));
}

#[tokio::test]
async fn delete_removes_any_row() {
    let (_dir, pool, app) = setup().await;
    login(&app).await;

    let id = moderation::submit(&pool, &submission_input("arXiv:1"))
        .await
        .unwrap();
    moderation::approve(&pool, id, None).await.unwrap();

    let response = app
        .oneshot(request_json(
            "DELETE",
            &format!("/api/submissions/{}", id),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(moderation::get_submission(&pool, id).await.unwrap().is_none());
}
