//! Suspend role: hides suspended accounts and items, and writes the hide
//! through to everything that belongs to them.

mod activity;
mod forum;
mod group;
mod member;

pub use activity::ActivitySuspend;
pub use forum::{ForumSuspend, ReplySuspend, TopicSuspend};
pub use group::GroupSuspend;
pub use member::MemberSuspend;

use crate::adapter::RelatedContents;
use crate::query::IdSet;
use shroud_db::entities::ContentType;

/// Record `ids` under `content_type` unless there are none.
fn insert_related(related: &mut RelatedContents, content_type: ContentType, ids: IdSet) {
    if !ids.is_empty() {
        related.insert(content_type, ids.into_iter().collect());
    }
}
