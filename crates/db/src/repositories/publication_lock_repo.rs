//! Repository for `publication_locks`.
//!
//! Acquire is a single upsert against `uq_publication_locks_publication_id`:
//! of two concurrent inserts exactly one wins, and the loser falls into the
//! `DO UPDATE` arm, whose `WHERE` only lets the update through when the row
//! is expired, already owned by the caller, or the caller forces it.

use pubcal_core::types::DbId;
use sqlx::PgPool;

use crate::models::publication_lock::{AcquireLock, PublicationLock};

/// Column list for `publication_locks` queries.
const COLUMNS: &str =
    "id, publication_id, user_id, expires_at, ip_address, user_agent, created_at, updated_at";

/// Row-per-publication edit locks with read-time expiry.
pub struct PublicationLockRepo;

impl PublicationLockRepo {
    /// Insert or take over the lock row.
    ///
    /// Returns the written row, or `None` when another user holds an
    /// unexpired lock and `force` was not set. The existing row is left
    /// untouched in that case.
    pub async fn acquire(
        pool: &PgPool,
        input: &AcquireLock,
    ) -> Result<Option<PublicationLock>, sqlx::Error> {
        let query = format!(
            "INSERT INTO publication_locks \
                (publication_id, user_id, expires_at, ip_address, user_agent) \
             VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'), $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_publication_locks_publication_id DO UPDATE \
             SET user_id = EXCLUDED.user_id, \
                 expires_at = EXCLUDED.expires_at, \
                 ip_address = EXCLUDED.ip_address, \
                 user_agent = EXCLUDED.user_agent \
             WHERE publication_locks.user_id = EXCLUDED.user_id \
                OR publication_locks.expires_at <= NOW() \
                OR $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PublicationLock>(&query)
            .bind(input.publication_id)
            .bind(input.user_id)
            .bind(input.ttl_secs as f64)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(input.force)
            .fetch_optional(pool)
            .await
    }

    /// The lock row for a publication, expired or not.
    pub async fn find(
        pool: &PgPool,
        publication_id: DbId,
    ) -> Result<Option<PublicationLock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM publication_locks WHERE publication_id = $1");
        sqlx::query_as::<_, PublicationLock>(&query)
            .bind(publication_id)
            .fetch_optional(pool)
            .await
    }

    /// The lock row for a publication if it has not expired.
    pub async fn find_active(
        pool: &PgPool,
        publication_id: DbId,
    ) -> Result<Option<PublicationLock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM publication_locks \
             WHERE publication_id = $1 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, PublicationLock>(&query)
            .bind(publication_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the lock if `user_id` owns it. Returns `true` if a row was
    /// removed.
    pub async fn release(
        pool: &PgPool,
        publication_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM publication_locks WHERE publication_id = $1 AND user_id = $2")
                .bind(publication_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
