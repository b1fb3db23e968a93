//! Row-level calendar mutations.
//!
//! Each function runs inside a caller-owned transaction, reloads the row
//! scoped to the caller's workspace with `FOR UPDATE`, checks permission,
//! and only then writes. A composite id is never trusted on its own.
//!
//! Publications and scheduled posts need the `ManageContent` capability;
//! user calendar events may only be touched by their owner.

use pubcal_core::bulk::EntitySnapshot;
use pubcal_core::calendar::EventRef;
use pubcal_core::error::CoreError;
use pubcal_core::reschedule::EventSpan;
use pubcal_core::roles::Capability;
use pubcal_core::types::Timestamp;
use pubcal_db::models::publication::Publication;
use pubcal_db::models::scheduled_post::ScheduledPost;
use pubcal_db::models::user_calendar_event::UserCalendarEvent;
use pubcal_db::repositories::{PgTx, PublicationRepo, ScheduledPostRepo, UserCalendarEventRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::workspace::WorkspaceContext;

/// The row written by a reschedule, tagged with its entity type.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "resource", rename_all = "snake_case")]
pub enum MutatedResource {
    Publication(Publication),
    ScheduledPost(ScheduledPost),
    UserEvent(UserCalendarEvent),
}

fn not_found(event: EventRef) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: event.entity_type().entity_name(),
        id: event.resource_id(),
    })
}

fn require_owner(ctx: &WorkspaceContext, event: &UserCalendarEvent) -> AppResult<()> {
    if event.user_id != ctx.user_id() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the owner can modify this calendar event".into(),
        )));
    }
    Ok(())
}

async fn lock_publication(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    event: EventRef,
    include_deleted: bool,
) -> AppResult<Publication> {
    ctx.require(Capability::ManageContent)?;
    PublicationRepo::lock_in_workspace(tx, ctx.workspace_id, event.resource_id(), include_deleted)
        .await?
        .ok_or_else(|| not_found(event))
}

async fn lock_scheduled_post(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    event: EventRef,
    include_deleted: bool,
) -> AppResult<ScheduledPost> {
    ctx.require(Capability::ManageContent)?;
    ScheduledPostRepo::lock_in_workspace(tx, ctx.workspace_id, event.resource_id(), include_deleted)
        .await?
        .ok_or_else(|| not_found(event))
}

async fn lock_user_event(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    event: EventRef,
    include_deleted: bool,
) -> AppResult<UserCalendarEvent> {
    let row = UserCalendarEventRepo::lock_in_workspace(
        tx,
        ctx.workspace_id,
        event.resource_id(),
        include_deleted,
    )
    .await?
    .ok_or_else(|| not_found(event))?;
    require_owner(ctx, &row)?;
    Ok(row)
}

/// Move one event so it starts at `new_start`.
///
/// Point events only get a new `scheduled_at`; ranged user events keep the
/// duration of the pre-mutation row. Returns the snapshot needed to undo the
/// move and the updated row.
pub async fn move_event(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    event: EventRef,
    new_start: Timestamp,
) -> AppResult<(EntitySnapshot, MutatedResource)> {
    match event {
        EventRef::Publication(id) => {
            let row = lock_publication(tx, ctx, event, false).await?;
            let snapshot = EntitySnapshot::Publication {
                id,
                scheduled_at: row.scheduled_at,
                deleted_at: row.deleted_at,
            };
            let updated = PublicationRepo::set_scheduled_at(tx, id, new_start).await?;
            Ok((snapshot, MutatedResource::Publication(updated)))
        }
        EventRef::ScheduledPost(id) => {
            let row = lock_scheduled_post(tx, ctx, event, false).await?;
            let snapshot = EntitySnapshot::ScheduledPost {
                id,
                scheduled_at: row.scheduled_at,
                deleted_at: row.deleted_at,
            };
            let updated = ScheduledPostRepo::set_scheduled_at(tx, id, new_start).await?;
            Ok((snapshot, MutatedResource::ScheduledPost(updated)))
        }
        EventRef::UserEvent(id) => {
            let row = lock_user_event(tx, ctx, event, false).await?;
            let snapshot = EntitySnapshot::UserEvent {
                id,
                start_date: row.start_date,
                end_date: row.end_date,
                deleted_at: row.deleted_at,
            };
            let moved = row.span().moved_to(new_start);
            let updated = UserCalendarEventRepo::set_span(tx, id, &moved).await?;
            Ok((snapshot, MutatedResource::UserEvent(updated)))
        }
    }
}

/// Soft-delete one event, returning its pre-delete snapshot.
pub async fn delete_event(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    event: EventRef,
) -> AppResult<EntitySnapshot> {
    match event {
        EventRef::Publication(id) => {
            let row = lock_publication(tx, ctx, event, false).await?;
            PublicationRepo::soft_delete(tx, id).await?;
            Ok(EntitySnapshot::Publication {
                id,
                scheduled_at: row.scheduled_at,
                deleted_at: row.deleted_at,
            })
        }
        EventRef::ScheduledPost(id) => {
            let row = lock_scheduled_post(tx, ctx, event, false).await?;
            ScheduledPostRepo::soft_delete(tx, id).await?;
            Ok(EntitySnapshot::ScheduledPost {
                id,
                scheduled_at: row.scheduled_at,
                deleted_at: row.deleted_at,
            })
        }
        EventRef::UserEvent(id) => {
            let row = lock_user_event(tx, ctx, event, false).await?;
            UserCalendarEventRepo::soft_delete(tx, id).await?;
            Ok(EntitySnapshot::UserEvent {
                id,
                start_date: row.start_date,
                end_date: row.end_date,
                deleted_at: row.deleted_at,
            })
        }
    }
}

/// Write a snapshot back verbatim. Soft-deleted rows are reloaded too, so
/// this reverses deletes as well as moves.
pub async fn restore_snapshot(
    tx: &mut PgTx<'_>,
    ctx: &WorkspaceContext,
    snapshot: &EntitySnapshot,
) -> AppResult<()> {
    let event = snapshot.event_ref();
    match *snapshot {
        EntitySnapshot::Publication {
            id,
            scheduled_at,
            deleted_at,
        } => {
            lock_publication(tx, ctx, event, true).await?;
            PublicationRepo::restore_state(tx, id, scheduled_at, deleted_at).await?;
        }
        EntitySnapshot::ScheduledPost {
            id,
            scheduled_at,
            deleted_at,
        } => {
            lock_scheduled_post(tx, ctx, event, true).await?;
            ScheduledPostRepo::restore_state(tx, id, scheduled_at, deleted_at).await?;
        }
        EntitySnapshot::UserEvent {
            id,
            start_date,
            end_date,
            deleted_at,
        } => {
            lock_user_event(tx, ctx, event, true).await?;
            let span = EventSpan::new(start_date, end_date);
            UserCalendarEventRepo::restore_state(tx, id, &span, deleted_at).await?;
        }
    }
    Ok(())
}
