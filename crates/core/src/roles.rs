//! Workspace role names and the capabilities each role grants.
//!
//! These must match the `workspace_members.role` check constraint in
//! `20260301000002_create_workspaces.sql`.

use serde::{Deserialize, Serialize};

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// The set of all valid workspace roles.
pub const VALID_ROLES: &[&str] = &[ROLE_OWNER, ROLE_ADMIN, ROLE_EDITOR, ROLE_VIEWER];

/// Permissions checked by calendar handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Create, reschedule, delete and lock publications and scheduled posts.
    ManageContent,
    /// Read the workspace calendar.
    ViewCalendar,
}

/// Returns `true` if `role` grants `capability`. Unknown roles grant nothing.
pub fn role_has_capability(role: &str, capability: Capability) -> bool {
    match capability {
        Capability::ManageContent => matches!(role, ROLE_OWNER | ROLE_ADMIN | ROLE_EDITOR),
        Capability::ViewCalendar => VALID_ROLES.contains(&role),
    }
}
