//! HTTP-level tests for the unified calendar listing, workspace scoping and
//! user calendar event creation.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, event_ids, get, json_ts, new_member, new_publication, new_workspace, post_json, ts,
};
use pubcal_db::models::user_calendar_event::CreateUserCalendarEvent;
use pubcal_db::repositories::{PublicationRepo, UserCalendarEventRepo};
use serde_json::json;
use sqlx::PgPool;

const JUNE: &str = "start=2025-06-01T00:00:00Z&end=2025-07-01T00:00:00Z";

fn user_event(
    workspace_id: i64,
    user_id: i64,
    title: &str,
    start: &str,
    is_public: bool,
) -> CreateUserCalendarEvent {
    CreateUserCalendarEvent {
        workspace_id,
        user_id,
        title: title.into(),
        description: None,
        color: None,
        start_date: ts(start),
        end_date: None,
        is_public,
        remind_at: None,
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn platform_filter_matches_realized_platforms(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;

    let reel = new_publication(&pool, &alice, "Reel", "2025-06-10T09:00:00Z").await;
    PublicationRepo::add_post_log(&pool, reel, "instagram", "published").await.unwrap();
    PublicationRepo::add_post_log(&pool, reel, "tiktok", "published").await.unwrap();
    let post = new_publication(&pool, &alice, "Post", "2025-06-12T09:00:00Z").await;
    PublicationRepo::add_post_log(&pool, post, "facebook", "published").await.unwrap();

    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/calendar/events?{JUNE}&platforms=instagram");
    let json = body_json(get(app.clone(), &uri, &alice).await).await;
    assert_eq!(event_ids(&json), vec![format!("pub_{reel}")]);

    let uri = format!("/api/v1/calendar/events?{JUNE}&platforms=tiktok,facebook");
    let mut ids = event_ids(&body_json(get(app.clone(), &uri, &alice).await).await);
    ids.sort();
    let mut expected = vec![format!("pub_{reel}"), format!("pub_{post}")];
    expected.sort();
    assert_eq!(ids, expected);

    let uri = format!("/api/v1/calendar/events?{JUNE}");
    assert_eq!(event_ids(&body_json(get(app, &uri, &alice).await).await).len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publication_event_shape(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let id = new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;
    PublicationRepo::add_post_log(&pool, id, "instagram", "published").await.unwrap();

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events?{JUNE}");
    let response = get(app, &uri, &alice).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let event = &json["data"][0];
    assert_eq!(event["id"], format!("pub_{id}"));
    assert_eq!(event["resource_id"], id);
    assert_eq!(event["entity_type"], "publication");
    assert_eq!(event["title"], "Launch");
    assert_eq!(json_ts(&event["start"]), ts("2025-06-10T09:00:00Z"));
    assert_eq!(event["platform"], "instagram");
    assert_eq!(event["owner"]["name"], "Alice");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn private_user_events_are_hidden_from_others(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let bob = new_member(&pool, ws, "Bob", "editor").await;

    let own = UserCalendarEventRepo::create(
        &pool,
        &user_event(ws, alice.user_id, "Dentist", "2025-06-03T08:00:00Z", false),
    )
    .await
    .unwrap();
    let shared = UserCalendarEventRepo::create(
        &pool,
        &user_event(ws, bob.user_id, "Offsite", "2025-06-04T08:00:00Z", true),
    )
    .await
    .unwrap();
    UserCalendarEventRepo::create(
        &pool,
        &user_event(ws, bob.user_id, "Gym", "2025-06-05T08:00:00Z", false),
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events?{JUNE}");
    let mut ids = event_ids(&body_json(get(app, &uri, &alice).await).await);
    ids.sort();

    let mut expected = vec![format!("user_event_{}", own.id), format!("user_event_{}", shared.id)];
    expected.sort();
    assert_eq!(ids, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn events_outside_window_are_excluded(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    let inside = new_publication(&pool, &alice, "June", "2025-06-30T23:59:00Z").await;
    new_publication(&pool, &alice, "July", "2025-07-01T00:00:00Z").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events?{JUNE}");
    let json = body_json(get(app, &uri, &alice).await).await;
    assert_eq!(event_ids(&json), vec![format!("pub_{inside}")]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_campaign_filter_is_rejected(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/calendar/events?{JUNE}&campaigns=abc");
    let response = get(app, &uri, &alice).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::send(app, Method::GET, "/api/v1/calendar/events", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_workspace_header_is_bad_request(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;

    let app = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .uri("/api/v1/calendar/events")
        .header("authorization", format!("Bearer {}", alice.token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_member_is_forbidden(pool: PgPool) {
    let acme = new_workspace(&pool, "Acme").await;
    let other = new_workspace(&pool, "Other").await;
    let alice = new_member(&pool, acme, "Alice", "editor").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/calendar/events", &alice.in_workspace(other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// User calendar events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_event_normalizes_local_time(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "viewer")
        .await
        .with_timezone("Europe/Madrid");

    let app = common::build_test_app(pool);
    let body = json!({
        "title": "Planning",
        "start_date": "2025-06-10T10:00:00",
        "end_date": "2025-06-10T11:30:00",
        "is_public": true
    });
    let response = post_json(app.clone(), "/api/v1/calendar/user-events", &alice, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json_ts(&json["data"]["start_date"]), ts("2025-06-10T08:00:00Z"));
    assert_eq!(json_ts(&json["data"]["end_date"]), ts("2025-06-10T09:30:00Z"));
    assert_eq!(json["data"]["user_id"], alice.user_id);
    assert_eq!(common::cache_version(app, &alice).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_event_rejects_inverted_span(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;

    let app = common::build_test_app(pool);
    let body = json!({
        "title": "Backwards",
        "start_date": "2025-06-10T10:00:00Z",
        "end_date": "2025-06-10T09:00:00Z"
    });
    let response = post_json(app, "/api/v1/calendar/user-events", &alice, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_window_returns_nothing(pool: PgPool) {
    let ws = new_workspace(&pool, "Acme").await;
    let alice = new_member(&pool, ws, "Alice", "editor").await;
    new_publication(&pool, &alice, "Launch", "2025-06-10T09:00:00Z").await;

    let app = common::build_test_app(pool);
    let uri = "/api/v1/calendar/events?start=2025-06-30T00:00:00Z&end=2025-06-01T00:00:00Z";
    let response = get(app, uri, &alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(event_ids(&body_json(response).await).is_empty());
}
