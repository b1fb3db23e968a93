//! Route definitions for publication edit locks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::locks;
use crate::state::AppState;

/// Publication routes mounted at `/publications`.
///
/// ```text
/// GET  /{id}/lock      -> get_lock
/// POST /{id}/lock      -> acquire_lock
/// POST /{id}/unlock    -> release_lock
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/lock", get(locks::get_lock).post(locks::acquire_lock))
        .route("/{id}/unlock", post(locks::release_lock))
}
