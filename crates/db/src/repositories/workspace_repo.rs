//! Repositories for `workspaces`, `workspace_members` and
//! `workspace_cache_versions`.

use pubcal_core::types::DbId;
use sqlx::PgPool;

use crate::models::workspace::{CreateWorkspace, Workspace, WorkspaceMember};

// ---------------------------------------------------------------------------
// WorkspaceRepo
// ---------------------------------------------------------------------------

const WORKSPACE_COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides CRUD operations for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Insert a new workspace.
    pub async fn create(pool: &PgPool, input: &CreateWorkspace) -> Result<Workspace, sqlx::Error> {
        let query =
            format!("INSERT INTO workspaces (name) VALUES ($1) RETURNING {WORKSPACE_COLUMNS}");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// WorkspaceMemberRepo
// ---------------------------------------------------------------------------

const MEMBER_COLUMNS: &str = "id, workspace_id, user_id, role, created_at";

/// Workspace membership lookups used for permission checks.
pub struct WorkspaceMemberRepo;

impl WorkspaceMemberRepo {
    /// Add (or re-role) a member of a workspace.
    pub async fn upsert(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<WorkspaceMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspace_members (workspace_id, user_id, role) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_workspace_members_workspace_user \
             DO UPDATE SET role = EXCLUDED.role \
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, WorkspaceMember>(&query)
            .bind(workspace_id)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// The caller's role in a workspace, or `None` if not a member.
    pub async fn find_role(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT role FROM workspace_members WHERE workspace_id = $1 AND user_id = $2",
        )
        .bind(workspace_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(role,)| role))
    }
}

// ---------------------------------------------------------------------------
// CacheVersionRepo
// ---------------------------------------------------------------------------

/// The per-workspace publication-list cache version.
pub struct CacheVersionRepo;

impl CacheVersionRepo {
    /// Increment the version, initializing it to 1 if absent. Returns the new
    /// value.
    pub async fn bump(pool: &PgPool, workspace_id: DbId) -> Result<i64, sqlx::Error> {
        let (version,): (i64,) = sqlx::query_as(
            "INSERT INTO workspace_cache_versions (workspace_id) VALUES ($1) \
             ON CONFLICT (workspace_id) DO UPDATE \
             SET publication_list_version = workspace_cache_versions.publication_list_version + 1, \
                 updated_at = NOW() \
             RETURNING publication_list_version",
        )
        .bind(workspace_id)
        .fetch_one(pool)
        .await?;
        Ok(version)
    }

    /// The current version, or `None` if it was never bumped.
    pub async fn current(pool: &PgPool, workspace_id: DbId) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT publication_list_version FROM workspace_cache_versions \
             WHERE workspace_id = $1",
        )
        .bind(workspace_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(v,)| v))
    }
}
