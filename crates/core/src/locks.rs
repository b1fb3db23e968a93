//! Publication edit-lock constants and the acquire decision.
//!
//! A lock is a row keyed uniquely by publication with an expiry checked at
//! read time. There is no sweeper; expired rows linger until the next
//! acquire overwrites them. The database unique constraint is what makes two
//! racing acquires resolve to one winner; [`decide_acquire`] only classifies
//! the state a caller observed so handlers can log and report it.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Default lock lifetime in seconds (5 minutes).
pub const DEFAULT_LOCK_TTL_SECS: i64 = 300;

/// Shortest configurable lock lifetime in seconds.
pub const MIN_LOCK_TTL_SECS: i64 = 30;

/// Longest configurable lock lifetime in seconds (1 hour).
pub const MAX_LOCK_TTL_SECS: i64 = 3600;

/// How many times acquire re-reads the row after losing an insert race.
pub const MAX_ACQUIRE_ATTEMPTS: usize = 3;

/// Clamp a configured TTL into the supported range.
pub fn clamp_ttl_secs(secs: i64) -> i64 {
    secs.clamp(MIN_LOCK_TTL_SECS, MAX_LOCK_TTL_SECS)
}

/// Returns `true` if a lock expiring at `expires_at` no longer holds at `now`.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    expires_at <= now
}

/// The current holder of a lock as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockHolder {
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

/// How an acquire request relates to the observed lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireDecision {
    /// No row, or only an expired one.
    Fresh,
    /// The caller already holds the lock; this is a heartbeat.
    Renew,
    /// Another user holds an unexpired lock and the caller forces takeover.
    TakeOver { previous: LockHolder },
    /// Another user holds an unexpired lock.
    Denied { holder: LockHolder },
}

/// Classify an acquire against the lock row the caller observed.
pub fn decide_acquire(
    current: Option<LockHolder>,
    user_id: DbId,
    force: bool,
    now: Timestamp,
) -> AcquireDecision {
    match current {
        None => AcquireDecision::Fresh,
        Some(holder) if is_expired(holder.expires_at, now) => AcquireDecision::Fresh,
        Some(holder) if holder.user_id == user_id => AcquireDecision::Renew,
        Some(holder) if force => AcquireDecision::TakeOver { previous: holder },
        Some(holder) => AcquireDecision::Denied { holder },
    }
}
