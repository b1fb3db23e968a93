//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod bulk_operation;
pub mod publication;
pub mod publication_lock;
pub mod scheduled_post;
pub mod user;
pub mod user_calendar_event;
pub mod workspace;
