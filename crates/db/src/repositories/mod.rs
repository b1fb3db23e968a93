//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods used inside a
//! per-row transaction take `&mut Transaction<'_, Postgres>` instead.

pub mod bulk_operation_history_repo;
pub mod publication_lock_repo;
pub mod publication_repo;
pub mod scheduled_post_repo;
pub mod user_calendar_event_repo;
pub mod user_repo;
pub mod workspace_repo;

pub use bulk_operation_history_repo::BulkOperationHistoryRepo;
pub use publication_lock_repo::PublicationLockRepo;
pub use publication_repo::{CampaignRepo, PublicationRepo};
pub use scheduled_post_repo::{ScheduledPostRepo, SocialAccountRepo};
pub use user_calendar_event_repo::UserCalendarEventRepo;
pub use user_repo::UserRepo;
pub use workspace_repo::{CacheVersionRepo, WorkspaceMemberRepo, WorkspaceRepo};

/// A Postgres transaction, as passed to row-locking repository methods.
pub type PgTx<'c> = sqlx::Transaction<'c, sqlx::Postgres>;
