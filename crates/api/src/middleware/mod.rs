//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`workspace::WorkspaceContext`] -- Resolves the caller's workspace and role.
//! - [`timezone::ClientTimezone`] -- Reads the `X-User-Timezone` hint.

pub mod auth;
pub mod timezone;
pub mod workspace;
