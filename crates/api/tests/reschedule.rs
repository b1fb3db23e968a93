//! HTTP-level tests for `PATCH /api/v1/calendar/events/{id}`.

mod common;

use axum::http::StatusCode;
use common::{body_json, json_ts, new_member, new_publication, new_workspace, patch_json, ts};
use pubcal_db::models::user_calendar_event::CreateUserCalendarEvent;
use pubcal_db::repositories::{PublicationRepo, UserCalendarEventRepo};
use serde_json::json;
use sqlx::PgPool;

async fn new_user_event(pool: &PgPool, member: &common::Member, start: &str, end: &str) -> i64 {
    UserCalendarEventRepo::create(
        pool,
        &CreateUserCalendarEvent {
            workspace_id: member.workspace_id,
            user_id: member.user_id,
            title: "Workshop".into(),
            description: None,
            color: None,
            start_date: ts(start),
            end_date: Some(ts(end)),
            is_public: true,
            remind_at: None,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publication_is_moved_and_cache_bumped(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    assert_eq!(common::cache_version(app.clone(), &alice).await, 0);

    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let body = json!({ "scheduled_at": "2025-06-20T14:00:00Z", "type": "publication" });
    let response = patch_json(app.clone(), &uri, &alice, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "publication");
    assert_eq!(json_ts(&json["data"]["resource"]["scheduled_at"]), ts("2025-06-20T14:00:00Z"));

    let stored = PublicationRepo::find_in_workspace(&pool, ws, id).await.unwrap().unwrap();
    assert_eq!(stored.scheduled_at, Some(ts("2025-06-20T14:00:00Z")));
    assert_eq!(common::cache_version(app, &alice).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn local_time_uses_timezone_header(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor")
        .await
        .with_timezone("America/New_York");
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let body = json!({ "scheduled_at": "2025-06-20T10:00:00" });
    let json = body_json(patch_json(app, &uri, &alice, body).await).await;
    assert_eq!(json_ts(&json["data"]["resource"]["scheduled_at"]), ts("2025-06-20T14:00:00Z"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_event_keeps_its_duration(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "viewer").await;
    let id = new_user_event(&pool, &alice, "2025-06-10T10:00:00Z", "2025-06-10T12:30:00Z").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events/user_event_{id}");
    let body = json!({ "scheduled_at": "2025-06-15T09:00:00Z" });
    let response = patch_json(app, &uri, &alice, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "user_event");
    assert_eq!(json_ts(&json["data"]["resource"]["start_date"]), ts("2025-06-15T09:00:00Z"));
    assert_eq!(json_ts(&json["data"]["resource"]["end_date"]), ts("2025-06-15T11:30:00Z"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn viewer_cannot_move_publication(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let vera = new_member(&pool, ws, "Vera", "viewer").await;
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let response = patch_json(app, &uri, &vera, json!({ "scheduled_at": "2025-06-20T09:00:00Z" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let stored = PublicationRepo::find_in_workspace(&pool, ws, id).await.unwrap().unwrap();
    assert_eq!(stored.scheduled_at, Some(ts("2025-06-10T09:00:00Z")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owner_moves_user_event(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "owner").await;
    let bob = new_member(&pool, ws, "Bob", "editor").await;
    let id = new_user_event(&pool, &bob, "2025-06-10T10:00:00Z", "2025-06-10T11:00:00Z").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events/user_event_{id}");
    let response = patch_json(app, &uri, &alice, json!({ "scheduled_at": "2025-06-20T09:00:00Z" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_workspace_publication_is_not_found(pool: PgPool) {
    let acme = new_workspace(&pool, "Acme").await;
    let other = new_workspace(&pool, "Other").await;
    let alice = new_member(&pool, acme, "Alice", "editor").await;
    let olga = new_member(&pool, other, "Olga", "editor").await;
    let id = new_publication(&pool, &olga, "Theirs", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let response = patch_json(app, &uri, &alice, json!({ "scheduled_at": "2025-06-20T09:00:00Z" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let stored = PublicationRepo::find_in_workspace(&pool, other, id).await.unwrap().unwrap();
    assert_eq!(stored.scheduled_at, Some(ts("2025-06-10T09:00:00Z")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn declared_type_must_match_id(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let body = json!({ "scheduled_at": "2025-06-20T09:00:00Z", "type": "user_event" });
    let response = patch_json(app, &uri, &alice, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TYPE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_id_and_date_are_rejected(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool);
    let body = json!({ "scheduled_at": "2025-06-20T09:00:00Z" });
    let response = patch_json(app.clone(), "/api/v1/calendar/events/story_3", &alice, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let uri = format!("/api/v1/calendar/events/pub_{id}");
    let body = json!({ "scheduled_at": "next tuesday" });
    let response = patch_json(app.clone(), &uri, &alice, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert_eq!(common::cache_version(app, &alice).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn scheduled_post_is_moved(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let publication = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;
    let post = common::new_scheduled_post(&pool, &alice, publication, "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/calendar/events/post_{post}");
    let body = json!({ "scheduled_at": "2025-06-18T16:45:00Z", "type": "scheduled_post" });
    let response = patch_json(app, &uri, &alice, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["type"], "scheduled_post");
    assert_eq!(json["data"]["resource"]["id"], post);
    assert_eq!(
        common::post_scheduled_at(&pool, post).await,
        Some(ts("2025-06-18T16:45:00Z"))
    );

    // The parent publication is untouched.
    let stored = PublicationRepo::find_in_workspace(&pool, ws, publication)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.scheduled_at, Some(ts("2025-06-10T09:00:00Z")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn post_of_deleted_publication_is_not_found(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let publication = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;
    let post = common::new_scheduled_post(&pool, &alice, publication, "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "event_ids": [format!("pub_{publication}")], "operation": "delete" });
    common::post_json(app.clone(), "/api/v1/calendar/bulk-update", &alice, body).await;

    let uri = format!("/api/v1/calendar/events/post_{post}");
    let response = patch_json(app, &uri, &alice, json!({ "scheduled_at": "2025-06-18T16:45:00Z" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        common::post_scheduled_at(&pool, post).await,
        Some(ts("2025-06-10T09:00:00Z"))
    );
}
