//! Rescheduling arithmetic.
//!
//! Publications and scheduled posts are point events: moving them only sets
//! `scheduled_at`. User calendar events may be ranged; moving one keeps
//! `end - start` constant.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// The start/end pair of a user calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpan {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl EventSpan {
    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Self {
        Self { start, end }
    }

    /// Move the span so it starts at `new_start`.
    ///
    /// The duration is taken from `self` (the pre-mutation row). A span
    /// without an end stays open-ended.
    pub fn moved_to(&self, new_start: Timestamp) -> Self {
        let end = self.end.map(|end| new_start + (end - self.start));
        Self {
            start: new_start,
            end,
        }
    }
}

/// Reject spans that end before they start.
pub fn validate_span(span: &EventSpan) -> Result<(), CoreError> {
    match span.end {
        Some(end) if end < span.start => Err(CoreError::Validation(format!(
            "end_date ({end}) must not be before start_date ({})",
            span.start
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn ranged_event_keeps_duration() {
        let span = EventSpan::new(ts("2025-06-10T09:00:00Z"), Some(ts("2025-06-10T11:30:00Z")));
        let moved = span.moved_to(ts("2025-06-20T14:00:00Z"));
        assert_eq!(moved.start, ts("2025-06-20T14:00:00Z"));
        assert_eq!(moved.end, Some(ts("2025-06-20T16:30:00Z")));
    }

    #[test]
    fn shift_by_delta_moves_end_by_same_delta() {
        let span = EventSpan::new(ts("2025-06-10T09:00:00Z"), Some(ts("2025-06-12T09:00:00Z")));
        for hours in [-72_i64, -1, 0, 5, 1000] {
            let delta = Duration::hours(hours);
            let moved = span.moved_to(span.start + delta);
            assert_eq!(moved.end.unwrap() - span.end.unwrap(), delta);
        }
    }

    #[test]
    fn point_event_stays_open_ended() {
        let span = EventSpan::new(ts("2025-06-10T09:00:00Z"), None);
        let moved = span.moved_to(ts("2025-07-01T00:00:00Z"));
        assert_eq!(moved.end, None);
    }

    #[test]
    fn zero_length_span_stays_zero_length() {
        let at = ts("2025-06-10T09:00:00Z");
        let moved = EventSpan::new(at, Some(at)).moved_to(ts("2025-06-11T09:00:00Z"));
        assert_eq!(moved.end, Some(moved.start));
    }

    #[test]
    fn validate_span_rejects_inverted() {
        let bad = EventSpan::new(ts("2025-06-10T09:00:00Z"), Some(ts("2025-06-10T08:00:00Z")));
        assert!(validate_span(&bad).is_err());
        let open = EventSpan::new(ts("2025-06-10T09:00:00Z"), None);
        assert!(validate_span(&open).is_ok());
    }
}
