//! Scheduled post and social account models.

use pubcal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scheduled_posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledPost {
    pub id: DbId,
    pub publication_id: DbId,
    pub social_account_id: DbId,
    pub status: String,
    pub scheduled_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a scheduled post.
#[derive(Debug, Deserialize)]
pub struct CreateScheduledPost {
    pub publication_id: DbId,
    pub social_account_id: DbId,
    pub scheduled_at: Option<Timestamp>,
}

/// A row from the `social_accounts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SocialAccount {
    pub id: DbId,
    pub workspace_id: DbId,
    pub platform: String,
    pub name: String,
    pub created_at: Timestamp,
}
