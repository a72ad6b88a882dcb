use async_trait::async_trait;
use shroud_db::entities::activity::COMPONENT_GROUPS;
use shroud_db::entities::{ContentType, HideSource};
use tracing::warn;

use super::insert_related;
use crate::adapter::{ContentTypeAdapter, RelatedContents, SuspendAdapter};
use crate::listing::{ActivityFilter, GroupFilter};
use crate::modules::ModuleAvailability;
use crate::query::IdSet;
use crate::registry::QueryFilterRegistry;

/// Suspended groups. Hiding a group hides its activity and its forum.
#[derive(Debug, Clone, Copy)]
pub struct GroupSuspend {
    modules: ModuleAvailability,
}

impl GroupSuspend {
    #[must_use]
    pub const fn new(modules: ModuleAvailability) -> Self {
        Self { modules }
    }

    /// Every group created by `member_id`, hidden ones included.
    pub async fn get_member_group_ids(registry: &QueryFilterRegistry, member_id: i64) -> IdSet {
        registry
            .lookup_ids(GroupFilter {
                creator_id: Some(member_id),
                ..GroupFilter::default()
            })
            .await
    }

    async fn group_activity_ids(&self, group_id: i64, registry: &QueryFilterRegistry) -> IdSet {
        registry
            .lookup_ids(ActivityFilter {
                primary_ids: Some(IdSet::from([group_id])),
                object: Some(COMPONENT_GROUPS.to_string()),
                ..ActivityFilter::default()
            })
            .await
    }

    async fn group_forum_ids(&self, group_id: i64, registry: &QueryFilterRegistry) -> IdSet {
        match registry.groups().forum_id(group_id).await {
            Ok(forum_id) => forum_id.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, group_id, "Failed to load group forum");
                IdSet::new()
            }
        }
    }
}

#[async_trait]
impl ContentTypeAdapter for GroupSuspend {
    fn content_type(&self) -> ContentType {
        ContentType::Group
    }

    fn source(&self) -> HideSource {
        HideSource::Suspend
    }
}

#[async_trait]
impl SuspendAdapter for GroupSuspend {
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents {
        let mut related = RelatedContents::new();

        if self.modules.activity {
            insert_related(
                &mut related,
                ContentType::Activity,
                self.group_activity_ids(item_id, registry).await,
            );
        }
        if self.modules.forums {
            insert_related(
                &mut related,
                ContentType::Forum,
                self.group_forum_ids(item_id, registry).await,
            );
        }

        related
    }
}
