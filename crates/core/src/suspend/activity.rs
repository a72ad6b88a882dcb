use async_trait::async_trait;
use shroud_db::entities::activity::TYPE_COMMENT;
use shroud_db::entities::{ContentType, HideSource};

use super::insert_related;
use crate::adapter::{ContentTypeAdapter, RelatedContents, SuspendAdapter};
use crate::listing::ActivityFilter;
use crate::query::IdSet;
use crate::registry::QueryFilterRegistry;

/// Suspended activity. Hiding an activity hides its comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivitySuspend;

#[async_trait]
impl ContentTypeAdapter for ActivitySuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Activity
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for ActivitySuspend {
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        let comments = registry
            .lookup_ids(ActivityFilter {
                primary_ids: Some(IdSet::from([item_id])),
                activity_type: Some(TYPE_COMMENT.to_string()),
                ..ActivityFilter::default()
            })
            .await;

        let mut related = RelatedContents::new();
        insert_related(&mut related, ContentType::Activity, comments);
        related
    }
}
