//! Publication calendar API server library.
//!
//! Exposes config, state, error handling, extractors, calendar services and
//! routes so integration tests and the binary entrypoint can both use them.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod handlers;
pub mod locks;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
