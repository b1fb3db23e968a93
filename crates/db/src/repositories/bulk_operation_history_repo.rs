//! Repository for `bulk_operation_history`.

use pubcal_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::bulk_operation::{BulkOperationHistory, CreateBulkOperationHistory};

/// Column list for `bulk_operation_history` queries.
const COLUMNS: &str = "id, user_id, workspace_id, operation_type, event_ids, previous_state, \
                       new_state, successful_count, failed_count, error_details, created_at";

/// Stores the single-slot undo payload per (user, workspace).
pub struct BulkOperationHistoryRepo;

impl BulkOperationHistoryRepo {
    /// Record a completed bulk operation, replacing any earlier one for the
    /// same (user, workspace). Only the newest operation is ever undoable.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBulkOperationHistory,
    ) -> Result<BulkOperationHistory, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM bulk_operation_history WHERE user_id = $1 AND workspace_id = $2")
            .bind(input.user_id)
            .bind(input.workspace_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO bulk_operation_history \
                (user_id, workspace_id, operation_type, event_ids, previous_state, new_state, \
                 successful_count, failed_count, error_details) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let history = sqlx::query_as::<_, BulkOperationHistory>(&query)
            .bind(input.user_id)
            .bind(input.workspace_id)
            .bind(&input.operation_type)
            .bind(Json(&input.event_ids))
            .bind(Json(&input.previous_state))
            .bind(&input.new_state)
            .bind(input.successful_count)
            .bind(input.failed_count)
            .bind(Json(&input.error_details))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(history)
    }

    /// The most recent operation by `user_id` in `workspace_id`, regardless
    /// of age. The undo window is checked by the caller.
    pub async fn find_latest(
        pool: &PgPool,
        user_id: DbId,
        workspace_id: DbId,
    ) -> Result<Option<BulkOperationHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bulk_operation_history \
             WHERE user_id = $1 AND workspace_id = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, BulkOperationHistory>(&query)
            .bind(user_id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a history row. Returns `true` if it still existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bulk_operation_history WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
