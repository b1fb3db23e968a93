//! Single-level undo of the latest bulk operation.
//!
//! Only the newest history row of (caller, workspace) is considered, and
//! only within five minutes of its creation. The row is consumed whether or
//! not every snapshot could be restored; there is no redo.

use pubcal_core::bulk::{is_within_undo_window, undo_deadline, BulkResult, UNDO_WINDOW_SECS};
use pubcal_core::error::CoreError;
use pubcal_core::types::Timestamp;
use pubcal_db::repositories::BulkOperationHistoryRepo;
use pubcal_db::DbPool;
use serde::Serialize;

use super::bump_cache_version;
use super::mutation::restore_snapshot;
use crate::error::{AppError, AppResult};
use crate::middleware::workspace::WorkspaceContext;

/// Whether an undo is currently on offer.
#[derive(Debug, Serialize)]
pub struct UndoStatus {
    pub available: bool,
    pub operation_type: Option<String>,
    pub created_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub successful_count: Option<i32>,
}

/// Describe the latest undoable operation for the caller, if any.
pub async fn status(pool: &DbPool, ctx: &WorkspaceContext, now: Timestamp) -> AppResult<UndoStatus> {
    let latest =
        BulkOperationHistoryRepo::find_latest(pool, ctx.user_id(), ctx.workspace_id).await?;

    Ok(match latest {
        Some(h) if is_within_undo_window(h.created_at, now) => UndoStatus {
            available: true,
            operation_type: Some(h.operation_type),
            created_at: Some(h.created_at),
            expires_at: Some(undo_deadline(h.created_at)),
            successful_count: Some(h.successful_count),
        },
        _ => UndoStatus {
            available: false,
            operation_type: None,
            created_at: None,
            expires_at: None,
            successful_count: None,
        },
    })
}

/// Restore every snapshot of the latest bulk operation.
pub async fn undo_latest(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    now: Timestamp,
) -> AppResult<BulkResult> {
    let history = BulkOperationHistoryRepo::find_latest(pool, ctx.user_id(), ctx.workspace_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BulkOperationHistory",
            id: 0,
        }))?;

    if !is_within_undo_window(history.created_at, now) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Undo is only available for {} minutes after a bulk operation",
            UNDO_WINDOW_SECS / 60
        ))));
    }

    let snapshots = history.snapshots().map_err(|e| {
        AppError::InternalError(format!(
            "Corrupt undo payload in bulk operation {}: {e}",
            history.id
        ))
    })?;

    let mut result = BulkResult::new(snapshots.len());
    for snapshot in &snapshots {
        let id = snapshot.event_ref().composite_id();
        let outcome = async {
            let mut tx = pool.begin().await?;
            restore_snapshot(&mut tx, ctx, snapshot).await?;
            tx.commit().await?;
            Ok::<_, AppError>(())
        }
        .await;

        match outcome {
            Ok(()) => result.push_success(id),
            Err(e) => {
                tracing::debug!(event_id = %id, error = %e, "Undo item failed");
                result.push_failure(id, e.bulk_message());
            }
        }
    }

    BulkOperationHistoryRepo::delete(pool, history.id).await?;

    tracing::info!(
        user_id = ctx.user_id(),
        workspace_id = ctx.workspace_id,
        history_id = history.id,
        operation = %history.operation_type,
        restored = result.successful_count,
        failed = result.failed_count,
        "Bulk operation undone"
    );

    if result.successful_count > 0 {
        bump_cache_version(pool, ctx.workspace_id).await;
    }
    Ok(result)
}
