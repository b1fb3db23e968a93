//! Domain logic for the publication calendar.
//!
//! This crate has no internal dependencies and no database access. Everything
//! here operates on values passed in by the caller so the API layer, the
//! repositories, and tests can share the same rules.

pub mod bulk;
pub mod calendar;
pub mod error;
pub mod locks;
pub mod reschedule;
pub mod roles;
pub mod timezone;
pub mod types;
