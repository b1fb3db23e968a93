//! Repositories for `scheduled_posts` and `social_accounts`.
//!
//! Scheduled posts have no workspace column of their own; they are scoped
//! through their parent publication.

use pubcal_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::PgTx;
use crate::models::scheduled_post::{CreateScheduledPost, ScheduledPost, SocialAccount};

/// Column list for `scheduled_posts` queries.
const COLUMNS: &str = "id, publication_id, social_account_id, status, scheduled_at, \
                       deleted_at, created_at, updated_at";

/// Same columns qualified with the `sp` alias for joined queries.
const SP_COLUMNS: &str = "sp.id, sp.publication_id, sp.social_account_id, sp.status, \
                          sp.scheduled_at, sp.deleted_at, sp.created_at, sp.updated_at";

/// Provides CRUD operations for scheduled posts.
pub struct ScheduledPostRepo;

impl ScheduledPostRepo {
    /// Insert a new scheduled post.
    pub async fn create(
        pool: &PgPool,
        input: &CreateScheduledPost,
    ) -> Result<ScheduledPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO scheduled_posts (publication_id, social_account_id, scheduled_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(input.publication_id)
            .bind(input.social_account_id)
            .bind(input.scheduled_at)
            .fetch_one(pool)
            .await
    }

    /// Load and row-lock a scheduled post whose publication belongs to the
    /// workspace. Unless `include_deleted`, neither the post nor its
    /// publication may be soft-deleted.
    pub async fn lock_in_workspace(
        tx: &mut PgTx<'_>,
        workspace_id: DbId,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<ScheduledPost>, sqlx::Error> {
        let query = format!(
            "SELECT {SP_COLUMNS} FROM scheduled_posts sp \
             JOIN publications p ON p.id = sp.publication_id \
             WHERE sp.id = $1 AND p.workspace_id = $2 \
               AND ($3 OR (sp.deleted_at IS NULL AND p.deleted_at IS NULL)) \
             FOR UPDATE OF sp"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(include_deleted)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set `scheduled_at`.
    pub async fn set_scheduled_at(
        tx: &mut PgTx<'_>,
        id: DbId,
        scheduled_at: Timestamp,
    ) -> Result<ScheduledPost, sqlx::Error> {
        let query = format!(
            "UPDATE scheduled_posts SET scheduled_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(id)
            .bind(scheduled_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-delete a scheduled post.
    pub async fn soft_delete(tx: &mut PgTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scheduled_posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
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
        scheduled_at: Option<Timestamp>,
        deleted_at: Option<Timestamp>,
    ) -> Result<ScheduledPost, sqlx::Error> {
        let query = format!(
            "UPDATE scheduled_posts SET scheduled_at = $2, deleted_at = $3 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduledPost>(&query)
            .bind(id)
            .bind(scheduled_at)
            .bind(deleted_at)
            .fetch_one(&mut **tx)
            .await
    }
}

/// Provides CRUD operations for social accounts.
pub struct SocialAccountRepo;

impl SocialAccountRepo {
    pub async fn create(
        pool: &PgPool,
        workspace_id: DbId,
        platform: &str,
        name: &str,
    ) -> Result<SocialAccount, sqlx::Error> {
        sqlx::query_as::<_, SocialAccount>(
            "INSERT INTO social_accounts (workspace_id, platform, name) VALUES ($1, $2, $3) \
             RETURNING id, workspace_id, platform, name, created_at",
        )
        .bind(workspace_id)
        .bind(platform)
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
