//! Unified calendar query.
//!
//! Publications and user calendar events live in separate tables; this
//! module loads both for one window and projects them onto
//! [`CalendarEvent`]. The result is unordered across entity types.

use pubcal_core::calendar::{matches_platforms, CalendarEvent, CalendarFilters, CalendarWindow};
use pubcal_core::roles::Capability;
use pubcal_core::types::Timestamp;
use pubcal_db::repositories::{PublicationRepo, UserCalendarEventRepo};
use pubcal_db::DbPool;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::timezone::ClientTimezone;
use crate::middleware::workspace::WorkspaceContext;

/// Query parameters for `GET /calendar/events`. List values are
/// comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub platforms: Option<String>,
    pub campaigns: Option<String>,
    pub statuses: Option<String>,
}

/// Resolve the query window. A bound that fails to parse is dropped with a
/// warning and replaced by the current-month default.
pub fn resolve_window(query: &EventsQuery, tz: &ClientTimezone, now: Timestamp) -> CalendarWindow {
    let bound = |name: &str, raw: Option<&String>| {
        let raw = raw?;
        let parsed = tz.normalize(raw).map(|n| n.instant());
        if parsed.is_none() {
            tracing::warn!(bound = name, value = %raw, "Unparseable calendar bound, using default");
        }
        parsed
    };
    CalendarWindow::resolve(
        bound("start", query.start.as_ref()),
        bound("end", query.end.as_ref()),
        now,
    )
}

/// Load every calendar entry the caller may see in the requested window.
pub async fn load_events(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    tz: &ClientTimezone,
    query: &EventsQuery,
    now: Timestamp,
) -> AppResult<Vec<CalendarEvent>> {
    ctx.require(Capability::ViewCalendar)?;

    let window = resolve_window(query, tz, now);
    let filters = CalendarFilters::from_query(
        query.platforms.as_deref(),
        query.campaigns.as_deref(),
        query.statuses.as_deref(),
    )?;

    if window.is_empty() {
        tracing::debug!(
            workspace_id = ctx.workspace_id,
            window_start = %window.start,
            window_end = %window.end,
            "Empty calendar window, skipping queries"
        );
        return Ok(Vec::new());
    }

    let publications = PublicationRepo::list_for_calendar(
        pool,
        ctx.workspace_id,
        &window,
        &filters.statuses,
        &filters.campaigns,
    )
    .await?;

    let user_events =
        UserCalendarEventRepo::list_visible(pool, ctx.workspace_id, ctx.user_id(), &window)
            .await?;

    let mut events: Vec<CalendarEvent> = publications
        .into_iter()
        .filter(|row| matches_platforms(&row.platforms, &filters.platforms))
        .map(|row| row.into_calendar_event())
        .collect();
    events.extend(user_events.into_iter().map(|row| row.into_calendar_event()));

    tracing::debug!(
        workspace_id = ctx.workspace_id,
        user_id = ctx.user_id(),
        window_start = %window.start,
        window_end = %window.end,
        count = events.len(),
        "Loaded calendar events"
    );

    Ok(events)
}
