//! Handlers for the unified calendar.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use pubcal_db::models::user_calendar_event::CreateUserCalendarEventRequest;
use pubcal_db::repositories::CacheVersionRepo;

use crate::calendar::aggregator::{self, EventsQuery};
use crate::calendar::bulk::{self, BulkUpdateRequest};
use crate::calendar::reschedule::{self, RescheduleRequest};
use crate::calendar::{undo, user_events};
use crate::error::AppResult;
use crate::middleware::timezone::ClientTimezone;
use crate::middleware::workspace::WorkspaceContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/calendar/events
///
/// Publications and visible user events in the window, optionally filtered
/// by `platforms`, `campaigns` (ids) and `statuses`.
pub async fn list_events(
    ctx: WorkspaceContext,
    tz: ClientTimezone,
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> AppResult<impl IntoResponse> {
    let events = aggregator::load_events(&state.pool, &ctx, &tz, &query, Utc::now()).await?;
    Ok(Json(DataResponse { data: events }))
}

/// PATCH /api/v1/calendar/events/{id}
pub async fn reschedule_event(
    ctx: WorkspaceContext,
    tz: ClientTimezone,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RescheduleRequest>,
) -> AppResult<impl IntoResponse> {
    let resource = reschedule::reschedule(&state.pool, &ctx, &tz, &id, &input).await?;
    Ok(Json(DataResponse { data: resource }))
}

/// POST /api/v1/calendar/bulk-update
pub async fn bulk_update(
    ctx: WorkspaceContext,
    tz: ClientTimezone,
    State(state): State<AppState>,
    Json(input): Json<BulkUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let (ids, action) = bulk::parse_request(&input, &tz)?;
    let result = bulk::apply(&state.pool, &ctx, ids, action).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/calendar/bulk-undo
pub async fn bulk_undo(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let result = undo::undo_latest(&state.pool, &ctx, Utc::now()).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/calendar/bulk-undo
pub async fn undo_status(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let status = undo::status(&state.pool, &ctx, Utc::now()).await?;
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/calendar/cache-version
///
/// A workspace that never changed reports version 0.
pub async fn cache_version(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let version = CacheVersionRepo::current(&state.pool, ctx.workspace_id)
        .await?
        .unwrap_or(0);
    Ok(Json(DataResponse {
        data: serde_json::json!({ "publication_list_version": version }),
    }))
}

/// POST /api/v1/calendar/user-events
pub async fn create_user_event(
    ctx: WorkspaceContext,
    tz: ClientTimezone,
    State(state): State<AppState>,
    Json(input): Json<CreateUserCalendarEventRequest>,
) -> AppResult<impl IntoResponse> {
    let event = user_events::create(&state.pool, &ctx, &tz, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}
