use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use crate::db::{self, StatusChange, WorkRequestStatus};
use crate::tests::support::{TENANT_HEADER, create_tenant, create_test_server, tenant};

async fn submit(server: &TestServer, tenant_id: i64, body: Value) -> Value {
    let response = server
        .post("/api/work-requests")
        .add_header(TENANT_HEADER, tenant(tenant_id))
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

async fn move_to(server: &TestServer, id: i64, status: &str) -> axum_test::TestResponse {
    server
        .post(&format!("/api/work-requests/{id}/status"))
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "status": status, "actor": "Morgan Lee", "note": format!("moved to {status}") }))
        .await
}

fn basic_request() -> Value {
    json!({
        "customer_name": "Acme Corp",
        "title": "Quarterly payroll audit",
        "description": "Review Q1 payroll register",
        "budget_estimate": 2500.0,
        "start_date": "2024-04-01",
        "due_date": "2024-04-30"
    })
}

#[test]
fn test_status_lifecycle_rules() {
    use WorkRequestStatus::{Approved, Cancelled, Completed, InProgress, Rejected, Submitted, UnderReview};

    assert!(Submitted.can_transition_to(UnderReview));
    assert!(Submitted.can_transition_to(Cancelled));
    assert!(!Submitted.can_transition_to(Approved));
    assert!(UnderReview.can_transition_to(Approved));
    assert!(UnderReview.can_transition_to(Rejected));
    assert!(Approved.can_transition_to(InProgress));
    assert!(InProgress.can_transition_to(Completed));
    assert!(InProgress.can_transition_to(Cancelled));
    for terminal in [Rejected, Completed, Cancelled] {
        for next in [Submitted, UnderReview, Approved, Rejected, InProgress, Completed, Cancelled] {
            assert!(!terminal.can_transition_to(next), "{terminal:?} -> {next:?}");
        }
    }
}

#[tokio::test]
async fn test_create_defaults() {
    let (server, _) = create_test_server().await;

    let created = submit(&server, 1, basic_request()).await;

    assert_eq!(created["status"], "submitted");
    assert_eq!(created["priority"], "medium");
    assert_eq!(created["category"], "general");
    assert_eq!(created["budget_estimate"], 2500.0);
    assert_eq!(created["due_date"], "2024-04-30");
    assert!(created["approved_by"].is_null());
}

#[tokio::test]
async fn test_negative_budget_is_rejected() {
    let (server, _) = create_test_server().await;
    let mut body = basic_request();
    body["budget_estimate"] = json!(-10);

    let response = server
        .post("/api/work-requests")
        .add_header(TENANT_HEADER, tenant(1))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_due_before_start_is_rejected() {
    let (server, _) = create_test_server().await;
    let mut body = basic_request();
    body["due_date"] = json!("2024-03-01");

    let response = server
        .post("/api/work-requests")
        .add_header(TENANT_HEADER, tenant(1))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_approval_flow_records_decision() {
    let (server, _) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();

    move_to(&server, id, "under_review").await.assert_status_ok();
    let approved: Value = move_to(&server, id, "approved").await.json();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], "Morgan Lee");
    assert!(approved["decided_at"].is_string());
    assert_eq!(approved["decision_note"], "moved to approved");

    move_to(&server, id, "in_progress").await.assert_status_ok();
    let completed: Value = move_to(&server, id, "completed").await.json();
    assert_eq!(completed["status"], "completed");
    // completing does not overwrite who approved it
    assert_eq!(completed["approved_by"], "Morgan Lee");
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let (server, _) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();

    move_to(&server, id, "completed").await.assert_status(StatusCode::CONFLICT);

    move_to(&server, id, "cancelled").await.assert_status_ok();
    move_to(&server, id, "under_review").await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_filters_by_status_and_tenant() {
    let (server, _) = create_test_server().await;
    let first = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();
    submit(&server, 1, basic_request()).await;
    let other = create_tenant(&server, "GLOBEX").await;
    submit(&server, other, basic_request()).await;
    move_to(&server, first, "under_review").await.assert_status_ok();

    let all: Value = server.get("/api/work-requests").add_header(TENANT_HEADER, tenant(1)).await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let reviewing: Value = server
        .get("/api/work-requests")
        .add_query_param("status", "under_review")
        .add_header(TENANT_HEADER, tenant(1))
        .await
        .json();
    let reviewing = reviewing.as_array().unwrap();
    assert_eq!(reviewing.len(), 1);
    assert_eq!(reviewing[0]["id"], first);
}

#[tokio::test]
async fn test_update_and_delete() {
    let (server, _) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();
    let path = format!("/api/work-requests/{id}");

    let updated: Value = server
        .patch(&path)
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "priority": "urgent", "budget_estimate": 4000 }))
        .await
        .json();
    assert_eq!(updated["priority"], "urgent");
    assert_eq!(updated["budget_estimate"], 4000.0);
    assert_eq!(updated["title"], "Quarterly payroll audit");

    server.delete(&path).add_header(TENANT_HEADER, tenant(1)).await.assert_status(StatusCode::NO_CONTENT);
    server.get(&path).add_header(TENANT_HEADER, tenant(1)).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_in_order() {
    let (server, _) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();
    let path = format!("/api/work-requests/{id}/comments");

    for body in ["First look done", "Waiting on finance"] {
        server
            .post(&path)
            .add_header(TENANT_HEADER, tenant(1))
            .json(&json!({ "author": "Taylor Brooks", "body": body }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let comments: Value = server.get(&path).add_header(TENANT_HEADER, tenant(1)).await.json();
    let bodies: Vec<&str> = comments.as_array().unwrap().iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["First look done", "Waiting on finance"]);

    let empty = server
        .post(&path)
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "author": "Taylor Brooks", "body": "  " }))
        .await;
    empty.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comments_on_other_tenants_request_are_404() {
    let (server, _) = create_test_server().await;
    let other = create_tenant(&server, "INITECH").await;
    let id = submit(&server, other, basic_request()).await["id"].as_i64().unwrap();

    let response = server
        .get(&format!("/api/work-requests/{id}/comments"))
        .add_header(TENANT_HEADER, tenant(1))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_checks_dates_against_stored_values() {
    let (server, _) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();
    let path = format!("/api/work-requests/{id}");

    // stored start_date is 2024-04-01
    let response = server
        .patch(&path)
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "due_date": "2024-03-15" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .patch(&path)
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "start_date": "2024-05-01" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let unchanged: Value = server.get(&path).add_header(TENANT_HEADER, tenant(1)).await.json();
    assert_eq!(unchanged["start_date"], "2024-04-01");
    assert_eq!(unchanged["due_date"], "2024-04-30");

    let moved: Value = server
        .patch(&path)
        .add_header(TENANT_HEADER, tenant(1))
        .json(&json!({ "due_date": "2024-04-10" }))
        .await
        .json();
    assert_eq!(moved["due_date"], "2024-04-10");
}

#[tokio::test]
async fn test_status_write_requires_the_status_that_was_read() {
    let (server, context) = create_test_server().await;
    let id = submit(&server, 1, basic_request()).await["id"].as_i64().unwrap();
    move_to(&server, id, "under_review").await.assert_status_ok();

    // a writer that still believes the request is submitted loses
    let stale = db::set_work_request_status(
        &context.db,
        1,
        id,
        WorkRequestStatus::Submitted,
        StatusChange { status: WorkRequestStatus::Cancelled, actor: None, note: None },
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let current = db::get_work_request(&context.db, 1, id).await.unwrap();
    assert_eq!(current.status, WorkRequestStatus::UnderReview);

    let applied = db::set_work_request_status(
        &context.db,
        1,
        id,
        WorkRequestStatus::UnderReview,
        StatusChange { status: WorkRequestStatus::Approved, actor: Some("Morgan Lee".to_string()), note: None },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(applied.status, WorkRequestStatus::Approved);
    assert_eq!(applied.approved_by.as_deref(), Some("Morgan Lee"));
}
