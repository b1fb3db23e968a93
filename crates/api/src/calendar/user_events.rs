//! Personal calendar entries.

use pubcal_core::error::CoreError;
use pubcal_core::reschedule::{validate_span, EventSpan};
use pubcal_db::models::user_calendar_event::{
    CreateUserCalendarEvent, CreateUserCalendarEventRequest, UserCalendarEvent,
};
use pubcal_db::repositories::UserCalendarEventRepo;
use pubcal_db::DbPool;

use super::bump_cache_version;
use crate::error::AppResult;
use crate::middleware::timezone::ClientTimezone;
use crate::middleware::workspace::WorkspaceContext;

/// Normalize a create request into UTC values owned by the caller.
pub fn build_event(
    ctx: &WorkspaceContext,
    tz: &ClientTimezone,
    input: CreateUserCalendarEventRequest,
) -> AppResult<CreateUserCalendarEvent> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()).into());
    }

    let start_date = tz.require_instant("start_date", &input.start_date)?;
    let end_date = tz.optional_instant("end_date", input.end_date.as_deref())?;
    let remind_at = tz.optional_instant("remind_at", input.remind_at.as_deref())?;
    validate_span(&EventSpan::new(start_date, end_date))?;

    Ok(CreateUserCalendarEvent {
        workspace_id: ctx.workspace_id,
        user_id: ctx.user_id(),
        title,
        description: input.description,
        color: input.color,
        start_date,
        end_date,
        is_public: input.is_public,
        remind_at,
    })
}

/// Create a user calendar event in the caller's workspace.
pub async fn create(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    tz: &ClientTimezone,
    input: CreateUserCalendarEventRequest,
) -> AppResult<UserCalendarEvent> {
    let event = build_event(ctx, tz, input)?;
    let created = UserCalendarEventRepo::create(pool, &event).await?;

    tracing::info!(
        user_id = ctx.user_id(),
        workspace_id = ctx.workspace_id,
        event_id = created.id,
        is_public = created.is_public,
        "User calendar event created"
    );

    bump_cache_version(pool, ctx.workspace_id).await;
    Ok(created)
}
