//! Handlers for publication edit locks.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use pubcal_core::types::DbId;
use pubcal_db::models::publication_lock::AcquireLockRequest;

use crate::error::AppResult;
use crate::locks::{self, ClientInfo};
use crate::middleware::workspace::WorkspaceContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/publications/{id}/lock
///
/// Acquire or renew the edit lock. Returns 423 with the current holder when
/// another user holds it, unless `force` is set. The body is optional.
pub async fn acquire_lock(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
    headers: HeaderMap,
    input: Option<Json<AcquireLockRequest>>,
) -> AppResult<impl IntoResponse> {
    let force = input.map(|Json(body)| body.force).unwrap_or(false);
    let lock = locks::acquire(
        &state.pool,
        &ctx,
        publication_id,
        force,
        state.config.lock_ttl_secs,
        ClientInfo::from_headers(&headers),
    )
    .await?;
    Ok(Json(DataResponse { data: lock }))
}

/// POST /api/v1/publications/{id}/unlock
pub async fn release_lock(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let released = locks::release(&state.pool, &ctx, publication_id).await?;
    Ok(Json(DataResponse {
        data: serde_json::json!({ "released": released }),
    }))
}

/// GET /api/v1/publications/{id}/lock
///
/// The unexpired lock, or `null`.
pub async fn get_lock(
    ctx: WorkspaceContext,
    State(state): State<AppState>,
    Path(publication_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lock = locks::current(&state.pool, &ctx, publication_id).await?;
    Ok(Json(DataResponse { data: lock }))
}
