use async_trait::async_trait;
use shroud_db::entities::{ContentType, HideSource};

use super::{GroupSuspend, insert_related};
use crate::adapter::{ContentTypeAdapter, RelatedContents, SuspendAdapter};
use crate::listing::{ActivityFilter, ForumFilter, ReplyFilter, TopicFilter};
use crate::modules::ModuleAvailability;
use crate::registry::QueryFilterRegistry;

/// Suspended members. Suspending a member hides everything they posted and
/// every group they created.
#[derive(Debug, Clone, Copy)]
pub struct MemberSuspend {
    modules: ModuleAvailability,
}

impl MemberSuspend {
    #[must_use]
    pub const fn new(modules: ModuleAvailability) -> Self {
        Self { modules }
    }
}

#[async_trait]
impl ContentTypeAdapter for MemberSuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Member
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for MemberSuspend {
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        let mut related = RelatedContents::new();

        if self.modules.activity {
            let activity = registry
                .lookup_ids(ActivityFilter {
                    user_id: Some(item_id),
                    ..ActivityFilter::default()
                })
                .await;
            insert_related(&mut related, ContentType::Activity, activity);
        }

        if self.modules.groups {
            let groups = GroupSuspend::get_member_group_ids(registry, item_id).await;
            insert_related(&mut related, ContentType::Group, groups);
        }

        if self.modules.forums {
            let forums = registry
                .lookup_ids(ForumFilter {
                    author_id: Some(item_id),
                    ..ForumFilter::default()
                })
                .await;
            insert_related(&mut related, ContentType::Forum, forums);

            let topics = registry
                .lookup_ids(TopicFilter {
                    author_id: Some(item_id),
                    ..TopicFilter::default()
                })
                .await;
            insert_related(&mut related, ContentType::Topic, topics);

            let replies = registry
                .lookup_ids(ReplyFilter {
                    author_id: Some(item_id),
                    ..ReplyFilter::default()
                })
                .await;
            insert_related(&mut related, ContentType::Reply, replies);
        }

        related
    }
}
