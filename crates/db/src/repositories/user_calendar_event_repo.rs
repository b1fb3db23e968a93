//! Repository for `user_calendar_events`.

use pubcal_core::calendar::CalendarWindow;
use pubcal_core::reschedule::EventSpan;
use pubcal_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::PgTx;
use crate::models::user_calendar_event::{
    CreateUserCalendarEvent, UserCalendarEvent, UserEventCalendarRow,
};

/// Column list for `user_calendar_events` queries.
const COLUMNS: &str = "id, workspace_id, user_id, title, description, color, start_date, \
                       end_date, is_public, remind_at, deleted_at, created_at, updated_at";

/// Provides CRUD operations for user calendar events.
pub struct UserCalendarEventRepo;

impl UserCalendarEventRepo {
    /// Insert a new event.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserCalendarEvent,
    ) -> Result<UserCalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_calendar_events \
                (workspace_id, user_id, title, description, color, start_date, end_date, \
                 is_public, remind_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserCalendarEvent>(&query)
            .bind(input.workspace_id)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_public)
            .bind(input.remind_at)
            .fetch_one(pool)
            .await
    }

    /// Load and row-lock an event inside a workspace. Ownership is checked by
    /// the caller so that "not yours" and "not here" stay distinct.
    pub async fn lock_in_workspace(
        tx: &mut PgTx<'_>,
        workspace_id: DbId,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<UserCalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_calendar_events \
             WHERE id = $1 AND workspace_id = $2 AND ($3 OR deleted_at IS NULL) \
             FOR UPDATE"
        );
        sqlx::query_as::<_, UserCalendarEvent>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(include_deleted)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Overwrite start and end.
    pub async fn set_span(
        tx: &mut PgTx<'_>,
        id: DbId,
        span: &EventSpan,
    ) -> Result<UserCalendarEvent, sqlx::Error> {
        let query = format!(
            "UPDATE user_calendar_events SET start_date = $2, end_date = $3 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserCalendarEvent>(&query)
            .bind(id)
            .bind(span.start)
            .bind(span.end)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-delete an event.
    pub async fn soft_delete(tx: &mut PgTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_calendar_events SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write back a snapshot verbatim.
    pub async fn restore_state(
        tx: &mut PgTx<'_>,
        id: DbId,
        span: &EventSpan,
        deleted_at: Option<Timestamp>,
    ) -> Result<UserCalendarEvent, sqlx::Error> {
        let query = format!(
            "UPDATE user_calendar_events SET start_date = $2, end_date = $3, deleted_at = $4 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserCalendarEvent>(&query)
            .bind(id)
            .bind(span.start)
            .bind(span.end)
            .bind(deleted_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Events overlapping `window` that `viewer_id` may see: public ones and
    /// the viewer's own.
    ///
    /// An open-ended event occupies only its start instant.
    pub async fn list_visible(
        pool: &PgPool,
        workspace_id: DbId,
        viewer_id: DbId,
        window: &CalendarWindow,
    ) -> Result<Vec<UserEventCalendarRow>, sqlx::Error> {
        sqlx::query_as::<_, UserEventCalendarRow>(
            "SELECT e.id, e.user_id, u.name AS owner_name, e.title, e.description, e.color, \
                    e.start_date, e.end_date, e.is_public, e.remind_at \
             FROM user_calendar_events e \
             JOIN users u ON u.id = e.user_id \
             WHERE e.workspace_id = $1 \
               AND e.deleted_at IS NULL \
               AND (e.is_public OR e.user_id = $2) \
               AND e.start_date < $4 \
               AND COALESCE(e.end_date, e.start_date) >= $3 \
             ORDER BY e.start_date, e.id",
        )
        .bind(workspace_id)
        .bind(viewer_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await
    }
}
