//! Publication models, the calendar read model, and related DTOs.

use pubcal_core::calendar::{CalendarEvent, EntityType, EventOwner, EventRef};
use pubcal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

/// A row from the `publications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Publication {
    pub id: DbId,
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub status: String,
    pub scheduled_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a publication.
#[derive(Debug, Deserialize)]
pub struct CreatePublication {
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub status: Option<String>,
    pub scheduled_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Related rows
// ---------------------------------------------------------------------------

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub workspace_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `publication_media` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicationMedia {
    pub id: DbId,
    pub publication_id: DbId,
    pub thumbnail_url: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// A row from the `publication_post_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicationPostLog {
    pub id: DbId,
    pub publication_id: DbId,
    pub platform: String,
    pub status: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Calendar read model
// ---------------------------------------------------------------------------

/// A publication joined with its owner, first thumbnail, campaign names and
/// realized platforms, as loaded for the calendar.
#[derive(Debug, Clone, FromRow)]
pub struct PublicationCalendarRow {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_name: String,
    pub title: String,
    pub status: String,
    pub scheduled_at: Timestamp,
    pub thumbnail_url: Option<String>,
    /// Campaign names ordered by campaign id.
    pub campaigns: Vec<String>,
    /// Distinct platforms ordered by their first log entry.
    pub platforms: Vec<String>,
}

impl PublicationCalendarRow {
    /// Project onto the unified calendar. Platform and campaign show the
    /// first element of each set; the full sets go into `extended_props`.
    pub fn into_calendar_event(self) -> CalendarEvent {
        let event_ref = EventRef::Publication(self.id);
        CalendarEvent {
            id: event_ref,
            resource_id: self.id,
            entity_type: EntityType::Publication,
            title: self.title,
            start: self.scheduled_at,
            end: None,
            status: self.status,
            platform: self.platforms.first().cloned(),
            campaign: self.campaigns.first().cloned(),
            owner: EventOwner {
                id: self.user_id,
                name: self.owner_name,
            },
            extended_props: serde_json::json!({
                "thumbnail_url": self.thumbnail_url,
                "platforms": self.platforms,
                "campaigns": self.campaigns,
            }),
        }
    }
}
