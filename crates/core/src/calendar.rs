//! Unified calendar types: composite event ids, the query window, filters,
//! and the `CalendarEvent` projection returned to clients.
//!
//! Three independently stored entities appear on one timeline. Clients only
//! ever see an opaque composite id (`pub_42`, `post_7`, `user_event_3`);
//! [`EventRef`] is the only way to turn one back into a typed resource id.
//! A parsed `EventRef` is not a capability: every mutation must reload the
//! row scoped to the caller's workspace before touching it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity types
// ---------------------------------------------------------------------------

/// Composite-id prefix for publications.
pub const PREFIX_PUBLICATION: &str = "pub";
/// Composite-id prefix for scheduled posts.
pub const PREFIX_SCHEDULED_POST: &str = "post";
/// Composite-id prefix for user calendar events. `user_event_3` and `user_3`
/// both resolve, since only the leading token selects the type.
pub const PREFIX_USER_EVENT: &str = "user";

/// Status reported for user calendar events, which have no publishing state.
pub const USER_EVENT_STATUS: &str = "event";

/// The kinds of rows that can appear on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Publication,
    ScheduledPost,
    UserEvent,
}

impl EntityType {
    /// Convert from the wire/database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            "publication" => Ok(Self::Publication),
            "scheduled_post" => Ok(Self::ScheduledPost),
            "user_event" => Ok(Self::UserEvent),
            _ => Err(CoreError::InvalidType(format!(
                "Unknown event type '{s}'. Must be one of: publication, scheduled_post, user_event"
            ))),
        }
    }

    /// Convert to the wire/database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publication => "publication",
            Self::ScheduledPost => "scheduled_post",
            Self::UserEvent => "user_event",
        }
    }

    /// Entity name used in `NotFound` errors.
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Publication => "Publication",
            Self::ScheduledPost => "ScheduledPost",
            Self::UserEvent => "UserCalendarEvent",
        }
    }
}

// ---------------------------------------------------------------------------
// EventRef
// ---------------------------------------------------------------------------

/// A resolved composite id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum EventRef {
    Publication(DbId),
    ScheduledPost(DbId),
    UserEvent(DbId),
}

impl EventRef {
    /// Resolve a composite id such as `pub_42` or `user_event_3`.
    ///
    /// The leading `_`-separated token selects the entity type and the
    /// trailing token is the resource id. Anything in between is ignored.
    pub fn parse(composite: &str) -> Result<Self, CoreError> {
        let trimmed = composite.trim();
        let (Some((head, _)), Some((_, tail))) =
            (trimmed.split_once('_'), trimmed.rsplit_once('_'))
        else {
            return Err(CoreError::InvalidType(format!(
                "Malformed event id '{composite}'"
            )));
        };

        let entity_type = match head {
            PREFIX_PUBLICATION => EntityType::Publication,
            PREFIX_SCHEDULED_POST => EntityType::ScheduledPost,
            PREFIX_USER_EVENT => EntityType::UserEvent,
            other => {
                return Err(CoreError::InvalidType(format!(
                    "Unknown event id prefix '{other}'"
                )))
            }
        };

        let id: DbId = tail.parse().map_err(|_| {
            CoreError::Validation(format!("Event id '{composite}' has no numeric resource id"))
        })?;
        if id <= 0 {
            return Err(CoreError::Validation(format!(
                "Event id '{composite}' must end with a positive resource id"
            )));
        }

        Ok(Self::new(entity_type, id))
    }

    pub fn new(entity_type: EntityType, id: DbId) -> Self {
        match entity_type {
            EntityType::Publication => Self::Publication(id),
            EntityType::ScheduledPost => Self::ScheduledPost(id),
            EntityType::UserEvent => Self::UserEvent(id),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Publication(_) => EntityType::Publication,
            Self::ScheduledPost(_) => EntityType::ScheduledPost,
            Self::UserEvent(_) => EntityType::UserEvent,
        }
    }

    pub fn resource_id(&self) -> DbId {
        match self {
            Self::Publication(id) | Self::ScheduledPost(id) | Self::UserEvent(id) => *id,
        }
    }

    /// The canonical composite id handed out to clients.
    pub fn composite_id(&self) -> String {
        match self {
            Self::Publication(id) => format!("{PREFIX_PUBLICATION}_{id}"),
            Self::ScheduledPost(id) => format!("{PREFIX_SCHEDULED_POST}_{id}"),
            Self::UserEvent(id) => format!("{PREFIX_USER_EVENT}_event_{id}"),
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composite_id())
    }
}

impl FromStr for EventRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EventRef> for String {
    fn from(value: EventRef) -> Self {
        value.composite_id()
    }
}

impl TryFrom<String> for EventRef {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl CalendarWindow {
    /// The calendar month containing `now`, in UTC.
    pub fn month_of(now: Timestamp) -> Self {
        let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
            .unwrap_or_else(|| now.date_naive());
        let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
        Self {
            start: Utc.from_utc_datetime(&first.and_time(chrono::NaiveTime::MIN)),
            end: Utc.from_utc_datetime(&next.and_time(chrono::NaiveTime::MIN)),
        }
    }

    /// Build a window from optional bounds, defaulting each missing bound to
    /// the current month. An inverted window is kept as-is and simply
    /// matches nothing.
    pub fn resolve(start: Option<Timestamp>, end: Option<Timestamp>, now: Timestamp) -> Self {
        let default = Self::month_of(now);
        Self {
            start: start.unwrap_or(default.start),
            end: end.unwrap_or(default.end),
        }
    }

    /// An inverted or zero-length window matches nothing.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Optional filters applied to publications. Empty lists mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarFilters {
    pub platforms: Vec<String>,
    pub campaigns: Vec<DbId>,
    pub statuses: Vec<String>,
}

impl CalendarFilters {
    /// Parse comma-separated query values. Platforms and statuses are
    /// lower-cased; campaign ids that are not integers are rejected.
    pub fn from_query(
        platforms: Option<&str>,
        campaigns: Option<&str>,
        statuses: Option<&str>,
    ) -> Result<Self, CoreError> {
        let campaigns = split_csv(campaigns)
            .into_iter()
            .map(|c| {
                c.parse::<DbId>().map_err(|_| {
                    CoreError::Validation(format!("Invalid campaign id '{c}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            platforms: split_csv(platforms),
            campaigns,
            statuses: split_csv(statuses),
        })
    }
}

/// Split a comma-separated value into trimmed, lower-cased, non-empty parts.
pub fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Keep a publication iff its realized platforms intersect the requested set.
/// An empty request keeps everything.
pub fn matches_platforms(realized: &[String], requested: &[String]) -> bool {
    if requested.is_empty() {
        return true;
    }
    realized
        .iter()
        .any(|p| requested.iter().any(|r| r.eq_ignore_ascii_case(p)))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// The user shown as owner of a calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventOwner {
    pub id: DbId,
    pub name: String,
}

/// A single entry on the unified calendar. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: EventRef,
    pub resource_id: DbId,
    pub entity_type: EntityType,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub status: String,
    /// First realized platform. A display hint only.
    pub platform: Option<String>,
    /// First campaign. A display hint only.
    pub campaign: Option<String>,
    pub owner: EventOwner,
    pub extended_props: serde_json::Value,
}
