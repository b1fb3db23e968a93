//! Client-local datetime to UTC conversion.
//!
//! Clients send wall-clock times together with an IANA timezone hint
//! (`X-User-Timezone`). Conversion favours availability: a missing or
//! unknown zone falls back to the server default, and a wall-clock time that
//! cannot be localized is returned unconverted (read as UTC). Callers doing
//! precision-critical work should check [`Normalized::is_converted`].

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::types::Timestamp;

/// Naive wall-clock layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Outcome of a normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized {
    /// The input was converted to UTC through a timezone (or carried its own
    /// offset).
    Converted(Timestamp),
    /// The wall-clock time could not be localized and was read as UTC.
    Unconverted(Timestamp),
}

impl Normalized {
    pub fn instant(&self) -> Timestamp {
        match self {
            Self::Converted(at) | Self::Unconverted(at) => *at,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Self::Converted(_))
    }
}

/// Parse an IANA timezone name. Returns `None` for unknown or empty names.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    name.parse::<Tz>().ok()
}

/// Pick the hinted timezone if valid, else `default`.
pub fn resolve_timezone(hint: Option<&str>, default: Tz) -> Tz {
    hint.and_then(parse_timezone).unwrap_or(default)
}

/// Convert a client datetime string to a UTC instant.
///
/// - RFC 3339 input carries its own offset and ignores the hint.
/// - Naive input (`2025-06-15T10:00`, `2025-06-15 10:00:00`, `2025-06-15`)
///   is localized in the hinted zone, or `default` when the hint is absent
///   or invalid. Ambiguous local times resolve to the earlier instant.
/// - A local time that does not exist (DST gap) is returned unconverted.
///
/// Returns `None` only when the input is not a datetime at all.
pub fn normalize_to_utc(input: &str, hint: Option<&str>, default: Tz) -> Option<Normalized> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(Normalized::Converted(dt.with_timezone(&Utc)));
    }

    let naive = parse_naive(input)?;
    let tz = resolve_timezone(hint, default);

    Some(match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Normalized::Converted(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Normalized::Converted(earliest.with_timezone(&Utc)),
        LocalResult::None => Normalized::Unconverted(Utc.from_utc_datetime(&naive)),
    })
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
