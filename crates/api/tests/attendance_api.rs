//! Integration tests for `POST /api/v1/attendance/check`.
//!
//! Check-in runs against an in-memory member store, so these tests need
//! no database.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::Days;
use common::{body_json, build_app_with_store, member, post_json, today, unreachable_pool};
use gymdesk_core::check_in::memory::InMemoryMemberStore;
use gymdesk_core::check_in::DuplicateCheckInPolicy;
use serde_json::json;
use tower::ServiceExt;

fn store_with_count_ticket(remain: i32) -> Arc<InMemoryMemberStore> {
    let mut m = member(1, "Kim Minsu", "010-1234-5678");
    m.ticket_type = Some("10 sessions".to_string());
    m.start_date = today().checked_sub_days(Days::new(5));
    m.end_date = today().checked_add_days(Days::new(10));
    m.remain_count = Some(remain);
    Arc::new(InMemoryMemberStore::new(vec![m]))
}

// ---------------------------------------------------------------------------
// Success paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_ticket_consumes_one_session() {
    let store = store_with_count_ticket(3);
    let app = build_app_with_store(unreachable_pool(), store.clone(), DuplicateCheckInPolicy::Allow);

    let response = post_json(app, "/api/v1/attendance/check", json!({ "phone": "01012345678" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["member_id"], 1);
    assert_eq!(data["member_name"], "Kim Minsu");
    assert_eq!(data["advisory"], "COMPLETED");
    assert_eq!(data["remain_count"], 2);
    assert_eq!(data["remain_days"], 10);
    assert_eq!(data["visit_count"], 1);
    assert_eq!(data["last_visit_date"], today().to_string());

    let stored = store.get(1).await.unwrap();
    assert_eq!(stored.remain_count, Some(2));
}

#[tokio::test]
async fn formatted_phone_matches_member() {
    let app = build_app_with_store(
        unreachable_pool(),
        store_with_count_ticket(3),
        DuplicateCheckInPolicy::Allow,
    );

    let response =
        post_json(app, "/api/v1/attendance/check", json!({ "phone": " 010 1234-5678 " })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn member_without_ticket_gets_advisory() {
    let store = Arc::new(InMemoryMemberStore::new(vec![member(7, "Lee", "010-5555-6666")]));
    let app = build_app_with_store(unreachable_pool(), store, DuplicateCheckInPolicy::Allow);

    let response = post_json(app, "/api/v1/attendance/check", json!({ "phone": "010-5555-6666" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["advisory"], "NO_ACTIVE_TICKET");
    assert!(json["data"]["remain_count"].is_null());
    assert_eq!(json["data"]["visit_count"], 1);
}

#[tokio::test]
async fn exhausted_ticket_checks_in_without_consuming() {
    let store = store_with_count_ticket(0);
    let app = build_app_with_store(unreachable_pool(), store.clone(), DuplicateCheckInPolicy::Allow);

    let response = post_json(app, "/api/v1/attendance/check", json!({ "phone": "010-1234-5678" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["advisory"], "NO_REMAIN_COUNT");
    assert_eq!(json["data"]["remain_count"], 0);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_phone_returns_member_not_found() {
    let store = store_with_count_ticket(3);
    let app = build_app_with_store(unreachable_pool(), store.clone(), DuplicateCheckInPolicy::Allow);

    let response = post_json(app, "/api/v1/attendance/check", json!({ "phone": "010-9999-0000" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MEMBER_NOT_FOUND");

    let untouched = store.get(1).await.unwrap();
    assert_eq!(untouched.visit_count, 0);
}

#[tokio::test]
async fn second_visit_rejected_under_reject_policy() {
    let store = store_with_count_ticket(3);
    let app = build_app_with_store(unreachable_pool(), store.clone(), DuplicateCheckInPolicy::Reject);

    let first = post_json(app.clone(), "/api/v1/attendance/check", json!({ "phone": "01012345678" })).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app, "/api/v1/attendance/check", json!({ "phone": "01012345678" })).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["code"], "ALREADY_CHECKED");

    let stored = store.get(1).await.unwrap();
    assert_eq!(stored.remain_count, Some(2));
    assert_eq!(stored.visit_count, 1);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = build_app_with_store(
        unreachable_pool(),
        store_with_count_ticket(3),
        DuplicateCheckInPolicy::Allow,
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/attendance/check")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "phone": "01012345678" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_unauthorized() {
    let app = build_app_with_store(
        unreachable_pool(),
        store_with_count_ticket(3),
        DuplicateCheckInPolicy::Allow,
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/attendance/check")
        .header("Authorization", "Bearer not-a-jwt")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "phone": "01012345678" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
