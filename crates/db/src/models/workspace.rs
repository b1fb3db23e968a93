//! Workspace, membership, and cache-version models.

use pubcal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workspaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a workspace.
#[derive(Debug, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
}

/// A row from the `workspace_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceMember {
    pub id: DbId,
    pub workspace_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}

/// A row from the `workspace_cache_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkspaceCacheVersion {
    pub workspace_id: DbId,
    pub publication_list_version: i64,
    pub updated_at: Timestamp,
}
