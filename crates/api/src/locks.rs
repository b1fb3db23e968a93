//! Publication edit locks.
//!
//! Unlocked --acquire--> Locked(owner, expires_at) --release|expire--> Unlocked.
//! The database upsert decides every race; the pre-read here only feeds the
//! logs. Expiry is checked lazily, so a stale row stays until the next
//! acquire overwrites it.

use axum::http::HeaderMap;
use chrono::Utc;
use pubcal_core::error::CoreError;
use pubcal_core::locks::{decide_acquire, AcquireDecision, MAX_ACQUIRE_ATTEMPTS};
use pubcal_core::roles::Capability;
use pubcal_core::types::DbId;
use pubcal_db::models::publication_lock::{AcquireLock, PublicationLock};
use pubcal_db::repositories::{PublicationLockRepo, PublicationRepo};
use pubcal_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::workspace::WorkspaceContext;

/// Client details stored with a lock.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    /// Read the client address (first `X-Forwarded-For` hop, else
    /// `X-Real-IP`) and `User-Agent`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| header("x-real-ip").map(str::to_string));

        Self {
            ip_address,
            user_agent: header("user-agent").map(str::to_string),
        }
    }
}

/// Ensure the publication exists in the caller's workspace.
async fn ensure_publication(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    publication_id: DbId,
) -> AppResult<()> {
    PublicationRepo::find_in_workspace(pool, ctx.workspace_id, publication_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Publication",
            id: publication_id,
        }))
}

/// Acquire, renew, or (with `force`) take over the lock on a publication.
///
/// Returns `Locked` carrying the current holder when another user holds an
/// unexpired lock and `force` is not set.
pub async fn acquire(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    publication_id: DbId,
    force: bool,
    ttl_secs: i64,
    client: ClientInfo,
) -> AppResult<PublicationLock> {
    ctx.require(Capability::ManageContent)?;
    ensure_publication(pool, ctx, publication_id).await?;

    let observed = PublicationLockRepo::find(pool, publication_id)
        .await?
        .map(|lock| lock.holder());
    let decision = decide_acquire(observed, ctx.user_id(), force, Utc::now());

    let input = AcquireLock {
        publication_id,
        user_id: ctx.user_id(),
        ttl_secs,
        force,
        ip_address: client.ip_address,
        user_agent: client.user_agent,
    };

    for attempt in 1..=MAX_ACQUIRE_ATTEMPTS {
        if let Some(lock) = PublicationLockRepo::acquire(pool, &input).await? {
            log_granted(&decision, &lock);
            return Ok(lock);
        }

        // The upsert declined; report whoever holds the row now.
        match PublicationLockRepo::find_active(pool, publication_id).await? {
            Some(holder) => {
                tracing::debug!(
                    publication_id,
                    user_id = ctx.user_id(),
                    holder_user_id = holder.user_id,
                    "Publication lock denied"
                );
                return Err(AppError::Core(CoreError::Locked {
                    holder_user_id: holder.user_id,
                    expires_at: holder.expires_at,
                }));
            }
            None => {
                tracing::debug!(publication_id, attempt, "Lock holder vanished, retrying");
            }
        }
    }

    Err(AppError::Core(CoreError::Conflict(format!(
        "Could not acquire lock on publication {publication_id} after \
         {MAX_ACQUIRE_ATTEMPTS} attempts"
    ))))
}

fn log_granted(decision: &AcquireDecision, lock: &PublicationLock) {
    match decision {
        AcquireDecision::TakeOver { previous } => tracing::warn!(
            publication_id = lock.publication_id,
            previous_user_id = previous.user_id,
            previous_expires_at = %previous.expires_at,
            user_id = lock.user_id,
            "Publication lock forcibly taken over"
        ),
        AcquireDecision::Renew => tracing::debug!(
            publication_id = lock.publication_id,
            user_id = lock.user_id,
            expires_at = %lock.expires_at,
            "Publication lock renewed"
        ),
        AcquireDecision::Fresh | AcquireDecision::Denied { .. } => tracing::info!(
            publication_id = lock.publication_id,
            user_id = lock.user_id,
            expires_at = %lock.expires_at,
            "Publication lock acquired"
        ),
    }
}

/// Release the caller's lock. Returns `false` when the caller did not hold it.
pub async fn release(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    publication_id: DbId,
) -> AppResult<bool> {
    ensure_publication(pool, ctx, publication_id).await?;

    let released = PublicationLockRepo::release(pool, publication_id, ctx.user_id()).await?;
    if released {
        tracing::info!(publication_id, user_id = ctx.user_id(), "Publication lock released");
    } else {
        tracing::debug!(
            publication_id,
            user_id = ctx.user_id(),
            "Release ignored, caller does not hold the lock"
        );
    }
    Ok(released)
}

/// The unexpired lock on a publication, if any.
pub async fn current(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    publication_id: DbId,
) -> AppResult<Option<PublicationLock>> {
    ensure_publication(pool, ctx, publication_id).await?;
    Ok(PublicationLockRepo::find_active(pool, publication_id).await?)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert("user-agent", HeaderValue::from_static("calendar-ui/1.0"));

        let info = ClientInfo::from_headers(&headers);
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(info.user_agent.as_deref(), Some("calendar-ui/1.0"));
    }

    #[test]
    fn real_ip_is_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(
            ClientInfo::from_headers(&headers).ip_address.as_deref(),
            Some("198.51.100.4")
        );
    }

    #[test]
    fn missing_headers_yield_none() {
        let info = ClientInfo::from_headers(&HeaderMap::new());
        assert!(info.ip_address.is_none());
        assert!(info.user_agent.is_none());
    }
}
