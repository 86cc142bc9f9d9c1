//! End-to-end member, ticket and check-in flows against PostgreSQL.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Days;
use common::{body_json, build_pg_app, get_auth, post_json, send_json, today};
use serde_json::json;
use sqlx::PgPool;

async fn create_ticket(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(build_pg_app(pool.clone()), "/api/v1/tickets", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_member(pool: &PgPool, name: &str, phone: &str) -> i64 {
    let response = post_json(
        build_pg_app(pool.clone()),
        "/api/v1/members",
        json!({ "name": name, "phone": phone }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn member_lifecycle_with_ticket_and_check_in(pool: PgPool) {
    create_ticket(
        &pool,
        json!({ "ticket_type": "10 visits", "count": 10, "duration_days": 30, "price": 100000 }),
    )
    .await;
    let id = create_member(&pool, "Kim Jisoo", "01012345678").await;

    let response = get_auth(build_pg_app(pool.clone()), &format!("/api/v1/members/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["phone"], "010-1234-5678");

    let response = post_json(
        build_pg_app(pool.clone()),
        &format!("/api/v1/members/{id}/ticket"),
        json!({ "ticket_type": "10 visits" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let member = body_json(response).await["data"].clone();
    assert_eq!(member["remain_count"], 10);
    let expected_end = today().checked_add_days(Days::new(30)).unwrap();
    assert_eq!(member["end_date"], expected_end.to_string());

    let response = get_auth(
        build_pg_app(pool.clone()),
        &format!("/api/v1/members/{id}/entitlement"),
    )
    .await;
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["entitlement"]["state"], "valid");
    assert_eq!(view["entitlement"]["remaining_days"], 30);
    assert_eq!(view["membership_type"], "count");

    let response = post_json(
        build_pg_app(pool.clone()),
        "/api/v1/attendance/check",
        json!({ "phone": "010 1234 5678" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await["data"].clone();
    assert_eq!(receipt["advisory"], "COMPLETED");
    assert_eq!(receipt["remain_count"], 9);

    let response = get_auth(
        build_pg_app(pool.clone()),
        &format!("/api/v1/members/{id}/history"),
    )
    .await;
    let history = body_json(response).await["data"].clone();
    assert_eq!(history["registrations"].as_array().unwrap().len(), 1);
    assert_eq!(history["registrations"][0]["price"], 100000);
    assert_eq!(history["visits"].as_array().unwrap().len(), 1);
    assert_eq!(history["visits"][0]["consumed"], true);

    let response = get_auth(build_pg_app(pool.clone()), "/api/v1/statistics/dashboard").await;
    let stats = body_json(response).await["data"].clone();
    assert_eq!(stats["today_attendance"]["total"], 1);
    assert_eq!(stats["monthly_stats"]["revenue"], 100000);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_phone_is_a_conflict(pool: PgPool) {
    create_member(&pool, "Kim Jisoo", "010-1234-5678").await;

    let response = post_json(
        build_pg_app(pool.clone()),
        "/api/v1/members",
        json!({ "name": "Lee Minho", "phone": "01012345678" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "A member with this phone number already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_searches_by_phone_digits(pool: PgPool) {
    create_member(&pool, "Kim Jisoo", "010-1234-5678").await;
    create_member(&pool, "Lee Minho", "010-9999-0000").await;

    let response = get_auth(build_pg_app(pool.clone()), "/api/v1/members?search=1234").await;
    let page = body_json(response).await["data"].clone();

    assert_eq!(page["total"], 1);
    assert_eq!(page["members"][0]["name"], "Kim Jisoo");
    assert_eq!(page["total_pages"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_a_ticket_keeps_member_copies(pool: PgPool) {
    create_ticket(
        &pool,
        json!({ "ticket_type": "Monthly", "duration_days": 30, "price": 80000 }),
    )
    .await;
    let id = create_member(&pool, "Kim Jisoo", "010-1234-5678").await;
    post_json(
        build_pg_app(pool.clone()),
        &format!("/api/v1/members/{id}/ticket"),
        json!({ "ticket_type": "Monthly" }),
    )
    .await;

    let response = get_auth(
        build_pg_app(pool.clone()),
        "/api/v1/tickets/Monthly/delete-info",
    )
    .await;
    assert_eq!(body_json(response).await["data"]["affected_member_count"], 1);

    let response = send_json(
        build_pg_app(pool.clone()),
        Method::DELETE,
        "/api/v1/tickets/Monthly",
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_pg_app(pool.clone()), &format!("/api/v1/members/{id}")).await;
    assert_eq!(body_json(response).await["data"]["ticket_type"], "Monthly");

    let response = get_auth(build_pg_app(pool.clone()), "/api/v1/tickets/Monthly").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn assigning_unknown_ticket_is_not_found(pool: PgPool) {
    let id = create_member(&pool, "Kim Jisoo", "010-1234-5678").await;

    let response = post_json(
        build_pg_app(pool.clone()),
        &format!("/api/v1/members/{id}/ticket"),
        json!({ "ticket_type": "Nope" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
