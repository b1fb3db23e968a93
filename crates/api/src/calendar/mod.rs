//! Calendar services used by the handlers.
//!
//! - [`aggregator`] -- merges publications and user events into one timeline.
//! - [`mutation`] -- per-row move / delete / restore inside a transaction.
//! - [`reschedule`] -- single-event drag-and-drop.
//! - [`bulk`] -- best-effort multi-id move or delete.
//! - [`undo`] -- single-slot reversal of the latest bulk operation.
//! - [`user_events`] -- creation of personal calendar entries.

pub mod aggregator;
pub mod bulk;
pub mod mutation;
pub mod reschedule;
pub mod undo;
pub mod user_events;

use pubcal_core::types::DbId;
use pubcal_db::repositories::CacheVersionRepo;
use pubcal_db::DbPool;

/// Increment the workspace's publication-list cache version.
///
/// Runs after the mutation has committed. A failed bump only leaves clients
/// with a stale list, so it is logged rather than surfaced.
pub async fn bump_cache_version(pool: &DbPool, workspace_id: DbId) -> Option<i64> {
    match CacheVersionRepo::bump(pool, workspace_id).await {
        Ok(version) => {
            tracing::debug!(workspace_id, version, "Publication list cache version bumped");
            Some(version)
        }
        Err(e) => {
            tracing::warn!(workspace_id, error = %e, "Failed to bump cache version");
            None
        }
    }
}
