//! Single-event reschedule (calendar drag-and-drop).

use pubcal_core::calendar::{EntityType, EventRef};
use pubcal_core::error::CoreError;
use pubcal_db::DbPool;
use serde::Deserialize;

use super::bump_cache_version;
use super::mutation::{move_event, MutatedResource};
use crate::error::AppResult;
use crate::middleware::timezone::ClientTimezone;
use crate::middleware::workspace::WorkspaceContext;

/// Request body for `PATCH /calendar/events/{id}`.
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    /// New start, client-local unless it carries an offset.
    pub scheduled_at: String,
    /// Entity type the client believes it is moving. Must agree with the id.
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

/// Resolve the composite id and check it against the declared type.
pub fn resolve_target(composite_id: &str, declared: Option<&str>) -> Result<EventRef, CoreError> {
    let event = EventRef::parse(composite_id)?;
    if let Some(declared) = declared {
        let declared = EntityType::from_str_value(declared)?;
        if declared != event.entity_type() {
            return Err(CoreError::InvalidType(format!(
                "Event '{composite_id}' is a {}, not a {}",
                event.entity_type().as_str(),
                declared.as_str()
            )));
        }
    }
    Ok(event)
}

/// Move exactly one backing row and bump the workspace cache version.
pub async fn reschedule(
    pool: &DbPool,
    ctx: &WorkspaceContext,
    tz: &ClientTimezone,
    composite_id: &str,
    input: &RescheduleRequest,
) -> AppResult<MutatedResource> {
    let event = resolve_target(composite_id, input.entity_type.as_deref())?;
    let new_start = tz.require_instant("scheduled_at", &input.scheduled_at)?;

    let mut tx = pool.begin().await?;
    let (_, resource) = move_event(&mut tx, ctx, event, new_start).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = ctx.user_id(),
        workspace_id = ctx.workspace_id,
        event_id = %event,
        new_start = %new_start,
        "Calendar event rescheduled"
    );

    bump_cache_version(pool, ctx.workspace_id).await;
    Ok(resource)
}
