//! Workspace scoping and permission checks.
//!
//! Every calendar query and mutation runs inside the caller's current
//! workspace, chosen by the `X-Workspace-Id` header and confirmed against
//! `workspace_members`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pubcal_core::error::CoreError;
use pubcal_core::roles::{role_has_capability, Capability};
use pubcal_core::types::DbId;
use pubcal_db::repositories::WorkspaceMemberRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Header selecting the workspace a request operates in.
pub const WORKSPACE_HEADER: &str = "x-workspace-id";

/// An authenticated member acting inside one workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceContext {
    pub user: AuthUser,
    pub workspace_id: DbId,
    /// The caller's role in this workspace.
    pub role: String,
}

impl WorkspaceContext {
    pub fn user_id(&self) -> DbId {
        self.user.user_id
    }

    /// Whether the caller's workspace role grants `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        role_has_capability(&self.role, capability)
    }

    /// Reject with 403 unless the caller holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Role '{}' lacks the {capability:?} permission in this workspace",
                self.role
            ))))
        }
    }
}

impl FromRequestParts<AppState> for WorkspaceContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        let workspace_id: DbId = parts
            .headers
            .get(WORKSPACE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::BadRequest("Missing X-Workspace-Id header".into()))?
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest("X-Workspace-Id must be an integer".into()))?;

        let role = WorkspaceMemberRepo::find_role(&state.pool, workspace_id, user.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Forbidden(
                    "You are not a member of this workspace".into(),
                ))
            })?;

        Ok(WorkspaceContext {
            user,
            workspace_id,
            role,
        })
    }
}
