use async_trait::async_trait;
use shroud_db::entities::{ContentType, HideSource};

use crate::adapter::ContentTypeAdapter;

/// Blocked members. A leaf: nothing else hides a member.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberModeration;

#[async_trait]
impl ContentTypeAdapter for MemberModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Member
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }
}
