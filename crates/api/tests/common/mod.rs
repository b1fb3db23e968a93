//! Shared helpers for the HTTP-level integration tests.
//!
//! Requests go straight into the router via `tower::ServiceExt::oneshot`, so
//! every test runs the production middleware stack without a listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono_tz::Tz;
use http_body_util::BodyExt;
use pubcal_api::auth::jwt::{generate_access_token, JwtConfig};
use pubcal_api::config::ServerConfig;
use pubcal_api::router::build_app_router;
use pubcal_api::state::AppState;
use pubcal_core::types::{DbId, Timestamp};
use pubcal_db::models::publication::CreatePublication;
use pubcal_db::models::scheduled_post::CreateScheduledPost;
use pubcal_db::models::user::CreateUser;
use pubcal_db::models::user_calendar_event::CreateUserCalendarEvent;
use pubcal_db::models::workspace::CreateWorkspace;
use pubcal_db::repositories::{
    PublicationRepo, ScheduledPostRepo, SocialAccountRepo, UserCalendarEventRepo, UserRepo,
    WorkspaceMemberRepo, WorkspaceRepo,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        default_timezone: Tz::UTC,
        lock_ttl_secs: 300,
        jwt: JwtConfig {
            secret: "calendar-integration-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A signed-in user acting inside one workspace.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: DbId,
    pub workspace_id: DbId,
    pub token: String,
    pub timezone: Option<String>,
}

impl Member {
    /// The same user acting in another workspace they may not belong to.
    pub fn in_workspace(&self, workspace_id: DbId) -> Self {
        Self {
            workspace_id,
            ..self.clone()
        }
    }

    pub fn with_timezone(mut self, tz: &str) -> Self {
        self.timezone = Some(tz.to_string());
        self
    }
}

pub fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

pub async fn new_workspace(pool: &PgPool, name: &str) -> DbId {
    WorkspaceRepo::create(pool, &CreateWorkspace { name: name.into() })
        .await
        .unwrap()
        .id
}

/// Create a user, add them to the workspace with `role`, and mint a token.
pub async fn new_member(pool: &PgPool, workspace_id: DbId, name: &str, role: &str) -> Member {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        },
    )
    .await
    .unwrap();
    WorkspaceMemberRepo::upsert(pool, workspace_id, user.id, role)
        .await
        .unwrap();

    let token = generate_access_token(user.id, "member", &test_config().jwt).unwrap();
    Member {
        user_id: user.id,
        workspace_id,
        token,
        timezone: None,
    }
}

pub async fn new_publication(pool: &PgPool, owner: &Member, title: &str, at: &str) -> DbId {
    PublicationRepo::create(
        pool,
        &CreatePublication {
            workspace_id: owner.workspace_id,
            user_id: owner.user_id,
            title: title.into(),
            content: None,
            status: Some("scheduled".into()),
            scheduled_at: Some(ts(at)),
        },
    )
    .await
    .unwrap()
    .id
}

/// A scheduled post of `publication_id` on a fresh Instagram account.
pub async fn new_scheduled_post(
    pool: &PgPool,
    owner: &Member,
    publication_id: DbId,
    at: &str,
) -> DbId {
    let account = SocialAccountRepo::create(pool, owner.workspace_id, "instagram", "@acme")
        .await
        .unwrap();
    ScheduledPostRepo::create(
        pool,
        &CreateScheduledPost {
            publication_id,
            social_account_id: account.id,
            scheduled_at: Some(ts(at)),
        },
    )
    .await
    .unwrap()
    .id
}

/// A public user event owned by `owner`, spanning `start..end`.
pub async fn new_ranged_event(pool: &PgPool, owner: &Member, start: &str, end: &str) -> DbId {
    UserCalendarEventRepo::create(
        pool,
        &CreateUserCalendarEvent {
            workspace_id: owner.workspace_id,
            user_id: owner.user_id,
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

pub async fn post_scheduled_at(pool: &PgPool, id: DbId) -> Option<Timestamp> {
    let (at,): (Option<Timestamp>,) =
        sqlx::query_as("SELECT scheduled_at FROM scheduled_posts WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap();
    at
}

pub async fn event_span(pool: &PgPool, id: DbId) -> (Timestamp, Option<Timestamp>) {
    sqlx::query_as("SELECT start_date, end_date FROM user_calendar_events WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request as `member`. `None` sends no body and no content type.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    member: Option<&Member>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(m) = member {
        builder = builder
            .header("authorization", format!("Bearer {}", m.token))
            .header("x-workspace-id", m.workspace_id.to_string());
        if let Some(tz) = &m.timezone {
            builder = builder.header("x-user-timezone", tz);
        }
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, member: &Member) -> Response<Body> {
    send(app, Method::GET, uri, Some(member), None).await
}

pub async fn post(app: Router, uri: &str, member: &Member) -> Response<Body> {
    send(app, Method::POST, uri, Some(member), None).await
}

pub async fn post_json(app: Router, uri: &str, member: &Member, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(member), Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, member: &Member, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(member), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse a JSON timestamp field.
pub fn json_ts(value: &Value) -> Timestamp {
    value.as_str().unwrap().parse().unwrap()
}

/// Composite ids of the events in a list response.
pub fn event_ids(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

pub async fn cache_version(app: Router, member: &Member) -> i64 {
    let json = body_json(get(app, "/api/v1/calendar/cache-version", member).await).await;
    json["data"]["publication_list_version"].as_i64().unwrap()
}
