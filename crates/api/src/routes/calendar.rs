//! Route definitions for the unified calendar.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Calendar routes mounted at `/calendar`.
///
/// ```text
/// GET   /events             -> list_events
/// PATCH /events/{id}        -> reschedule_event
/// POST  /bulk-update        -> bulk_update
/// GET   /bulk-undo          -> undo_status
/// POST  /bulk-undo          -> bulk_undo
/// GET   /cache-version      -> cache_version
/// POST  /user-events        -> create_user_event
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(calendar::list_events))
        .route("/events/{id}", patch(calendar::reschedule_event))
        .route("/bulk-update", post(calendar::bulk_update))
        .route(
            "/bulk-undo",
            get(calendar::undo_status).post(calendar::bulk_undo),
        )
        .route("/cache-version", get(calendar::cache_version))
        .route("/user-events", post(calendar::create_user_event))
}
