//! Write-side services: recording and lifting hides.

pub mod moderation;
pub mod suspend;

pub use moderation::ModerationService;
pub use suspend::SuspendService;

use shroud_common::{AppError, AppResult};
use shroud_db::entities::{ContentType, HideSource};

use crate::registry::QueryFilterRegistry;

/// Reject content types whose module is not active on this site.
fn ensure_registered(
    registry: &QueryFilterRegistry,
    source: HideSource,
    content_type: ContentType,
) -> AppResult<()> {
    if registry.adapter(source, content_type).is_none() {
        return Err(inactive(content_type));
    }
    Ok(())
}

fn inactive(content_type: ContentType) -> AppError {
    AppError::BadRequest(format!("Content type {content_type} is not active"))
}
