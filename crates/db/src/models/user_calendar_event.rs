//! User calendar event model, DTOs, and calendar projection.

use pubcal_core::calendar::{CalendarEvent, EntityType, EventOwner, EventRef, USER_EVENT_STATUS};
use pubcal_core::reschedule::EventSpan;
use pubcal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserCalendarEvent {
    pub id: DbId,
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_public: bool,
    pub remind_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserCalendarEvent {
    pub fn span(&self) -> EventSpan {
        EventSpan::new(self.start_date, self.end_date)
    }
}

/// DTO for inserting a user calendar event. Dates are already UTC.
#[derive(Debug, Clone)]
pub struct CreateUserCalendarEvent {
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_public: bool,
    pub remind_at: Option<Timestamp>,
}

/// Request body for `POST /calendar/user-events`. Dates are client-local
/// strings normalized with the `X-User-Timezone` hint.
#[derive(Debug, Deserialize)]
pub struct CreateUserCalendarEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub remind_at: Option<String>,
}

/// A user calendar event joined with its owner's name.
#[derive(Debug, Clone, FromRow)]
pub struct UserEventCalendarRow {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_name: String,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Option<Timestamp>,
    pub is_public: bool,
    pub remind_at: Option<Timestamp>,
}

impl UserEventCalendarRow {
    /// Project onto the unified calendar. User events carry no platform or
    /// campaign.
    pub fn into_calendar_event(self) -> CalendarEvent {
        CalendarEvent {
            id: EventRef::UserEvent(self.id),
            resource_id: self.id,
            entity_type: EntityType::UserEvent,
            title: self.title,
            start: self.start_date,
            end: self.end_date,
            status: USER_EVENT_STATUS.to_string(),
            platform: None,
            campaign: None,
            owner: EventOwner {
                id: self.user_id,
                name: self.owner_name,
            },
            extended_props: serde_json::json!({
                "description": self.description,
                "color": self.color,
                "is_public": self.is_public,
                "remind_at": self.remind_at,
            }),
        }
    }
}
