//! Domain error taxonomy shared by the repository and HTTP layers.

use crate::types::{DbId, Timestamp};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Absent, soft-deleted, or in another workspace. The three are
    /// deliberately indistinguishable.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Unknown composite-id prefix, or a declared type that disagrees
    /// with the id.
    #[error("Invalid event type: {0}")]
    InvalidType(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A publication lock held by someone else.
    #[error("Publication is locked by user {holder_user_id} until {expires_at}")]
    Locked {
        holder_user_id: DbId,
        expires_at: Timestamp,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing capability or ownership.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
