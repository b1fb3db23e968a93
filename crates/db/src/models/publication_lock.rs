//! Publication edit-lock model and DTOs.

use pubcal_core::locks::LockHolder;
use pubcal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `publication_locks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicationLock {
    pub id: DbId,
    pub publication_id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PublicationLock {
    pub fn holder(&self) -> LockHolder {
        LockHolder {
            user_id: self.user_id,
            expires_at: self.expires_at,
        }
    }
}

/// Request body for `POST /publications/{id}/lock`.
#[derive(Debug, Default, Deserialize)]
pub struct AcquireLockRequest {
    #[serde(default)]
    pub force: bool,
}

/// Values written by an acquire.
#[derive(Debug, Clone)]
pub struct AcquireLock {
    pub publication_id: DbId,
    pub user_id: DbId,
    pub ttl_secs: i64,
    pub force: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
