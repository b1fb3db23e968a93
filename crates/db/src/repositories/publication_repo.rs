//! Repositories for `publications`, `campaigns`, and the publication
//! relations loaded by the calendar (media, campaigns, post logs).

use pubcal_core::calendar::CalendarWindow;
use pubcal_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use super::PgTx;
use crate::models::publication::{
    Campaign, CreatePublication, Publication, PublicationCalendarRow, PublicationMedia,
    PublicationPostLog,
};

/// Column list for `publications` queries.
const COLUMNS: &str = "id, workspace_id, user_id, title, content, status, scheduled_at, \
                       deleted_at, created_at, updated_at";

/// Provides CRUD and calendar queries for publications.
pub struct PublicationRepo;

impl PublicationRepo {
    /// Insert a new publication.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePublication,
    ) -> Result<Publication, sqlx::Error> {
        let query = format!(
            "INSERT INTO publications (workspace_id, user_id, title, content, status, scheduled_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'draft'), $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(input.workspace_id)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.status)
            .bind(input.scheduled_at)
            .fetch_one(pool)
            .await
    }

    /// Find a live publication inside a workspace. Rows from other
    /// workspaces are indistinguishable from missing ones.
    pub async fn find_in_workspace(
        pool: &PgPool,
        workspace_id: DbId,
        id: DbId,
    ) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publications \
             WHERE id = $1 AND workspace_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock a publication inside a workspace.
    ///
    /// Soft-deleted rows are only returned when `include_deleted` is set
    /// (used by undo to restore a bulk delete).
    pub async fn lock_in_workspace(
        tx: &mut PgTx<'_>,
        workspace_id: DbId,
        id: DbId,
        include_deleted: bool,
    ) -> Result<Option<Publication>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publications \
             WHERE id = $1 AND workspace_id = $2 AND ($3 OR deleted_at IS NULL) \
             FOR UPDATE"
        );
        sqlx::query_as::<_, Publication>(&query)
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
    ) -> Result<Publication, sqlx::Error> {
        let query = format!(
            "UPDATE publications SET scheduled_at = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .bind(scheduled_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Soft-delete a publication. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(tx: &mut PgTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE publications SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Write back a snapshot verbatim (schedule and deletion state).
    pub async fn restore_state(
        tx: &mut PgTx<'_>,
        id: DbId,
        scheduled_at: Option<Timestamp>,
        deleted_at: Option<Timestamp>,
    ) -> Result<Publication, sqlx::Error> {
        let query = format!(
            "UPDATE publications SET scheduled_at = $2, deleted_at = $3 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Publication>(&query)
            .bind(id)
            .bind(scheduled_at)
            .bind(deleted_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Load the publications of a workspace scheduled inside `window`,
    /// together with owner name, first thumbnail, campaign names and
    /// realized platforms.
    ///
    /// Status (`= ANY`) and campaign (`EXISTS`) filters run in SQL; an empty
    /// slice disables the filter. Platform filtering happens after the fetch
    /// because the platform set is derived from post logs.
    pub async fn list_for_calendar(
        pool: &PgPool,
        workspace_id: DbId,
        window: &CalendarWindow,
        statuses: &[String],
        campaign_ids: &[DbId],
    ) -> Result<Vec<PublicationCalendarRow>, sqlx::Error> {
        let statuses = (!statuses.is_empty()).then(|| statuses.to_vec());
        let campaign_ids = (!campaign_ids.is_empty()).then(|| campaign_ids.to_vec());

        sqlx::query_as::<_, PublicationCalendarRow>(
            "SELECT p.id, p.user_id, u.name AS owner_name, p.title, p.status, p.scheduled_at, \
                 (SELECT m.thumbnail_url FROM publication_media m \
                   WHERE m.publication_id = p.id \
                   ORDER BY m.position, m.id LIMIT 1) AS thumbnail_url, \
                 ARRAY(SELECT c.name FROM campaigns c \
                        JOIN publication_campaigns pc ON pc.campaign_id = c.id \
                       WHERE pc.publication_id = p.id \
                       ORDER BY c.id) AS campaigns, \
                 ARRAY(SELECT l.platform FROM publication_post_logs l \
                       WHERE l.publication_id = p.id \
                       GROUP BY l.platform \
                       ORDER BY MIN(l.id)) AS platforms \
             FROM publications p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.workspace_id = $1 \
               AND p.deleted_at IS NULL \
               AND p.scheduled_at >= $2 AND p.scheduled_at < $3 \
               AND ($4::text[] IS NULL OR p.status = ANY($4)) \
               AND ($5::bigint[] IS NULL OR EXISTS ( \
                     SELECT 1 FROM publication_campaigns fc \
                      WHERE fc.publication_id = p.id AND fc.campaign_id = ANY($5))) \
             ORDER BY p.scheduled_at, p.id",
        )
        .bind(workspace_id)
        .bind(window.start)
        .bind(window.end)
        .bind(statuses)
        .bind(campaign_ids)
        .fetch_all(pool)
        .await
    }

    /// Attach a campaign to a publication. Idempotent.
    pub async fn attach_campaign(
        pool: &PgPool,
        publication_id: DbId,
        campaign_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO publication_campaigns (publication_id, campaign_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(publication_id)
        .bind(campaign_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Add a media item.
    pub async fn add_media(
        pool: &PgPool,
        publication_id: DbId,
        thumbnail_url: &str,
        position: i32,
    ) -> Result<PublicationMedia, sqlx::Error> {
        sqlx::query_as::<_, PublicationMedia>(
            "INSERT INTO publication_media (publication_id, thumbnail_url, position) \
             VALUES ($1, $2, $3) \
             RETURNING id, publication_id, thumbnail_url, position, created_at",
        )
        .bind(publication_id)
        .bind(thumbnail_url)
        .bind(position)
        .fetch_one(pool)
        .await
    }

    /// Record a per-platform post log entry.
    pub async fn add_post_log(
        pool: &PgPool,
        publication_id: DbId,
        platform: &str,
        status: &str,
    ) -> Result<PublicationPostLog, sqlx::Error> {
        sqlx::query_as::<_, PublicationPostLog>(
            "INSERT INTO publication_post_logs (publication_id, platform, status) \
             VALUES ($1, $2, $3) \
             RETURNING id, publication_id, platform, status, created_at",
        )
        .bind(publication_id)
        .bind(platform)
        .bind(status)
        .fetch_one(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// CampaignRepo
// ---------------------------------------------------------------------------

/// Provides CRUD operations for campaigns.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Insert a new campaign.
    pub async fn create(
        pool: &PgPool,
        workspace_id: DbId,
        name: &str,
    ) -> Result<Campaign, sqlx::Error> {
        sqlx::query_as::<_, Campaign>(
            "INSERT INTO campaigns (workspace_id, name) VALUES ($1, $2) \
             RETURNING id, workspace_id, name, created_at, updated_at",
        )
        .bind(workspace_id)
        .bind(name)
        .fetch_one(pool)
        .await
    }
}
