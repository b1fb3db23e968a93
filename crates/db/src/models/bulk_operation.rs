//! Bulk operation history model (single-slot undo payload).

use pubcal_core::bulk::{BulkFailure, EntitySnapshot};
use pubcal_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bulk_operation_history` table.
///
/// `event_ids`, `previous_state`, `new_state` and `error_details` are JSONB;
/// `previous_state` is an array of [`EntitySnapshot`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BulkOperationHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub workspace_id: DbId,
    pub operation_type: String,
    pub event_ids: serde_json::Value,
    pub previous_state: serde_json::Value,
    pub new_state: serde_json::Value,
    pub successful_count: i32,
    pub failed_count: i32,
    pub error_details: serde_json::Value,
    pub created_at: Timestamp,
}

impl BulkOperationHistory {
    /// Decode the stored snapshots.
    pub fn snapshots(&self) -> Result<Vec<EntitySnapshot>, serde_json::Error> {
        serde_json::from_value(self.previous_state.clone())
    }
}

/// DTO for recording a completed bulk operation.
#[derive(Debug)]
pub struct CreateBulkOperationHistory {
    pub user_id: DbId,
    pub workspace_id: DbId,
    pub operation_type: String,
    pub event_ids: Vec<String>,
    pub previous_state: Vec<EntitySnapshot>,
    pub new_state: serde_json::Value,
    pub successful_count: i32,
    pub failed_count: i32,
    pub error_details: Vec<BulkFailure>,
}
