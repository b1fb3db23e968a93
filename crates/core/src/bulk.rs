//! Bulk calendar operations and single-slot undo.
//!
//! A bulk call applies one operation to many composite ids and never aborts
//! on a per-id error. Each success contributes an [`EntitySnapshot`] holding
//! the fields needed to reverse it; the snapshots are stored with the history
//! row and written back verbatim by undo.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::calendar::EventRef;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of ids accepted by one bulk call.
pub const MAX_BULK_IDS: usize = 500;

/// How long after a bulk operation undo is offered (5 minutes).
pub const UNDO_WINDOW_SECS: i64 = 300;

pub const OP_MOVE: &str = "move";
pub const OP_DELETE: &str = "delete";
pub const OP_UPDATE: &str = "update";

/// All operation type strings stored in `bulk_operation_history`.
pub const VALID_OPERATION_TYPES: &[&str] = &[OP_MOVE, OP_DELETE, OP_UPDATE];

// ---------------------------------------------------------------------------
// Operation type
// ---------------------------------------------------------------------------

/// Bulk operation kinds. `Update` exists in stored history but is not
/// accepted by the bulk-update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkOperationType {
    Move,
    Delete,
    Update,
}

impl BulkOperationType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            OP_MOVE => Ok(Self::Move),
            OP_DELETE => Ok(Self::Delete),
            OP_UPDATE => Ok(Self::Update),
            _ => Err(CoreError::Validation(format!(
                "Invalid operation '{s}'. Must be one of: {}",
                VALID_OPERATION_TYPES.join(", ")
            ))),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Move => OP_MOVE,
            Self::Delete => OP_DELETE,
            Self::Update => OP_UPDATE,
        }
    }
}

/// A validated bulk-update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Move { new_date: Timestamp },
    Delete,
}

impl BulkAction {
    /// Build an action from the requested operation and optional target date.
    pub fn new(operation: BulkOperationType, new_date: Option<Timestamp>) -> Result<Self, CoreError> {
        match (operation, new_date) {
            (BulkOperationType::Move, Some(new_date)) => Ok(Self::Move { new_date }),
            (BulkOperationType::Move, None) => Err(CoreError::Validation(
                "new_date is required for move operations".into(),
            )),
            (BulkOperationType::Delete, _) => Ok(Self::Delete),
            (BulkOperationType::Update, _) => Err(CoreError::Validation(
                "Operation 'update' is not supported for bulk calendar changes".into(),
            )),
        }
    }

    pub fn operation_type(&self) -> BulkOperationType {
        match self {
            Self::Move { .. } => BulkOperationType::Move,
            Self::Delete => BulkOperationType::Delete,
        }
    }

    /// The `new_state` payload stored with the history row.
    pub fn new_state(&self) -> serde_json::Value {
        match self {
            Self::Move { new_date } => serde_json::json!({
                "operation": OP_MOVE,
                "new_date": new_date,
            }),
            Self::Delete => serde_json::json!({ "operation": OP_DELETE }),
        }
    }
}

/// Trim, drop blanks, and de-duplicate ids while keeping request order.
pub fn normalize_ids(ids: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    if out.is_empty() {
        return Err(CoreError::Validation("event_ids must not be empty".into()));
    }
    if out.len() > MAX_BULK_IDS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_BULK_IDS} event_ids per request, got {}",
            out.len()
        )));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Pre-mutation state of one row, sufficient to reverse a move or a
/// (soft) delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum EntitySnapshot {
    Publication {
        id: DbId,
        scheduled_at: Option<Timestamp>,
        deleted_at: Option<Timestamp>,
    },
    ScheduledPost {
        id: DbId,
        scheduled_at: Option<Timestamp>,
        deleted_at: Option<Timestamp>,
    },
    UserEvent {
        id: DbId,
        start_date: Timestamp,
        end_date: Option<Timestamp>,
        deleted_at: Option<Timestamp>,
    },
}

impl EntitySnapshot {
    pub fn event_ref(&self) -> EventRef {
        match self {
            Self::Publication { id, .. } => EventRef::Publication(*id),
            Self::ScheduledPost { id, .. } => EventRef::ScheduledPost(*id),
            Self::UserEvent { id, .. } => EventRef::UserEvent(*id),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One id that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of a bulk operation or an undo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkResult {
    pub successful: Vec<String>,
    pub failed: Vec<BulkFailure>,
    pub total: usize,
    pub successful_count: usize,
    pub failed_count: usize,
}

impl BulkResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn push_success(&mut self, id: impl Into<String>) {
        self.successful.push(id.into());
        self.successful_count += 1;
    }

    pub fn push_failure(&mut self, id: impl Into<String>, error: impl ToString) {
        self.failed.push(BulkFailure {
            id: id.into(),
            error: error.to_string(),
        });
        self.failed_count += 1;
    }
}

// ---------------------------------------------------------------------------
// Undo window
// ---------------------------------------------------------------------------

/// The instant after which undo is no longer offered.
pub fn undo_deadline(created_at: Timestamp) -> Timestamp {
    created_at + Duration::seconds(UNDO_WINDOW_SECS)
}

/// Returns `true` if an operation created at `created_at` may still be undone.
pub fn is_within_undo_window(created_at: Timestamp, now: Timestamp) -> bool {
    now <= undo_deadline(created_at)
}
