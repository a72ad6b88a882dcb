use async_trait::async_trait;
use shroud_db::entities::{ContentType, HideSource};

use super::insert_related;
use crate::adapter::{ContentTypeAdapter, RelatedContents, SuspendAdapter};
use crate::listing::{ReplyFilter, TopicFilter};
use crate::query::IdSet;
use crate::registry::QueryFilterRegistry;

/// Suspended forums. Hiding a forum hides its topics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForumSuspend;

#[async_trait]
impl ContentTypeAdapter for ForumSuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Forum
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for ForumSuspend {
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        let topics = registry
            .lookup_ids(TopicFilter {
                forum_ids: Some(IdSet::from([item_id])),
                ..TopicFilter::default()
            })
            .await;

        let mut related = RelatedContents::new();
        insert_related(&mut related, ContentType::Topic, topics);
        related
    }
}

/// Suspended topics. Hiding a topic hides its replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicSuspend;

#[async_trait]
impl ContentTypeAdapter for TopicSuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Topic
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for TopicSuspend {
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        let replies = registry
            .lookup_ids(ReplyFilter {
                topic_ids: Some(IdSet::from([item_id])),
                ..ReplyFilter::default()
            })
            .await;

        let mut related = RelatedContents::new();
        insert_related(&mut related, ContentType::Reply, replies);
        related
    }
}

/// Suspended replies. Nothing depends on a reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplySuspend;

#[async_trait]
impl ContentTypeAdapter for ReplySuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Reply
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for ReplySuspend {
    async fn related_contents(
        &self,
        _item_id: i64,
        _registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        RelatedContents::new()
    }
}
