//! Client timezone extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono_tz::Tz;
use pubcal_core::error::CoreError;
use pubcal_core::timezone::{normalize_to_utc, Normalized};
use pubcal_core::types::Timestamp;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the client's IANA timezone.
pub const TIMEZONE_HEADER: &str = "x-user-timezone";

/// The optional `X-User-Timezone` hint plus the server fallback zone.
#[derive(Debug, Clone)]
pub struct ClientTimezone {
    pub hint: Option<String>,
    pub default: Tz,
}

impl ClientTimezone {
    /// Normalize a client datetime; `None` if it is not a datetime at all.
    pub fn normalize(&self, input: &str) -> Option<Normalized> {
        let normalized = normalize_to_utc(input, self.hint.as_deref(), self.default)?;
        if !normalized.is_converted() {
            tracing::warn!(
                input,
                timezone = ?self.hint,
                "Local time does not exist in timezone, using it unconverted"
            );
        }
        Some(normalized)
    }

    /// Normalize a datetime a mutation depends on. Unparseable input is a
    /// validation error naming `field`.
    pub fn require_instant(&self, field: &str, input: &str) -> Result<Timestamp, AppError> {
        self.normalize(input)
            .map(|n| n.instant())
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "{field} '{input}' is not a valid datetime"
                )))
            })
    }

    /// Normalize an optional datetime field.
    pub fn optional_instant(
        &self,
        field: &str,
        input: Option<&str>,
    ) -> Result<Option<Timestamp>, AppError> {
        input
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.require_instant(field, s))
            .transpose()
    }
}

impl FromRequestParts<AppState> for ClientTimezone {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let hint = parts
            .headers
            .get(TIMEZONE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(ClientTimezone {
            hint,
            default: state.config.default_timezone,
        })
    }
}
