pub mod calendar;
pub mod health;
pub mod publications;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /calendar/events                 list (GET)
/// /calendar/events/{id}            reschedule (PATCH)
/// /calendar/bulk-update            bulk move / delete (POST)
/// /calendar/bulk-undo              undo status (GET), undo (POST)
/// /calendar/cache-version          publication list cache version (GET)
/// /calendar/user-events            create user event (POST)
///
/// /publications/{id}/lock          current lock (GET), acquire (POST)
/// /publications/{id}/unlock        release (POST)
/// ```
///
/// Every route requires a bearer token and an `X-Workspace-Id` header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/calendar", calendar::router())
        .nest("/publications", publications::router())
}
