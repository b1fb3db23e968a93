//! Bulk move / delete.
//!
//! The batch is a fold over ids: each id gets its own transaction, and a
//! failure is recorded against that id without touching the others. One
//! history row is written afterwards if anything succeeded.

use pubcal_core::bulk::{normalize_ids, BulkAction, BulkOperationType, BulkResult, EntitySnapshot};
use pubcal_core::calendar::EventRef;
use pubcal_db::models::bulk_operation::CreateBulkOperationHistory;
use pubcal_db::repositories::BulkOperationHistoryRepo;
use pubcal_db::DbPool;
use serde::Deserialize;

use super::bump_cache_version;
use super::mutation::{delete_event, move_event};
use crate::error::AppResult;
use crate::middleware::timezone::ClientTimezone;
use crate::middleware::workspace::WorkspaceContext;

/// Request body for `POST /calendar/bulk-update`.
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub event_ids: Vec<String>,
    pub operation: String,
    /// Target start for `move`; ignored for `delete`.
    pub new_date: Option<String>,
}

/// Validate a bulk request into de-duplicated ids and an action.
pub fn parse_request(
    input: &BulkUpdateRequest,
    tz: &ClientTimezone,
) -> AppResult<(Vec<String>, BulkAction)> {
    let ids = normalize_ids(&input.event_ids)?;
    let operation = BulkOperationType::from_str_value(&input.operation)?;
    let new_date = match operation {
        BulkOperationType::Move => tz.optional_instant("new_date", input.new_date.as_deref())?,
        _ => None,
    };
    let action = BulkAction::new(operation, new_date)?;
    Ok((ids, action))
}

async fn apply_one(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    id: &str,
    action: &BulkAction,
) -> AppResult<EntitySnapshot> {
    let event = EventRef::parse(id)?;
    let mut tx = pool.begin().await?;
    let snapshot = match action {
        BulkAction::Move { new_date } => move_event(&mut tx, ctx, event, *new_date).await?.0,
        BulkAction::Delete => delete_event(&mut tx, ctx, event).await?,
    };
    tx.commit().await?;
    Ok(snapshot)
}

/// Apply `action` to every id, continuing past per-id failures.
pub async fn apply(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    ids: Vec<String>,
    action: BulkAction,
) -> AppResult<BulkResult> {
    let mut result = BulkResult::new(ids.len());
    let mut snapshots = Vec::with_capacity(ids.len());

    for id in &ids {
        match apply_one(pool, ctx, id, &action).await {
            Ok(snapshot) => {
                snapshots.push(snapshot);
                result.push_success(id.as_str());
            }
            Err(e) => {
                tracing::debug!(event_id = %id, error = %e, "Bulk item failed");
                result.push_failure(id.as_str(), e.bulk_message());
            }
        }
    }

    tracing::info!(
        user_id = ctx.user_id(),
        workspace_id = ctx.workspace_id,
        operation = action.operation_type().as_str(),
        successful = result.successful_count,
        failed = result.failed_count,
        "Bulk calendar operation finished"
    );

    if result.successful_count == 0 {
        return Ok(result);
    }

    let history = CreateBulkOperationHistory {
        user_id: ctx.user_id(),
        workspace_id: ctx.workspace_id,
        operation_type: action.operation_type().as_str().to_string(),
        event_ids: ids,
        previous_state: snapshots,
        new_state: action.new_state(),
        successful_count: result.successful_count as i32,
        failed_count: result.failed_count as i32,
        error_details: result.failed.clone(),
    };
    // The mutations are already committed; losing the history only loses undo.
    if let Err(e) = BulkOperationHistoryRepo::create(pool, &history).await {
        tracing::error!(
            user_id = ctx.user_id(),
            workspace_id = ctx.workspace_id,
            error = %e,
            "Failed to record bulk operation history"
        );
    }

    bump_cache_version(pool, ctx.workspace_id).await;
    Ok(result)
}
