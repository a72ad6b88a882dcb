use async_trait::async_trait;
use shroud_db::entities::activity::{COMPONENT_FORUMS, COMPONENT_GROUPS};
use shroud_db::entities::{ContentType, HideSource};

use crate::adapter::ContentTypeAdapter;
use crate::listing::ActivityFilter;
use crate::modules::ModuleAvailability;
use crate::query::{IdSet, Predicate, WhereConditions, columns};
use crate::registry::{ExclusionContext, QueryFilterRegistry};

/// Hidden activity: directly hidden items, items posted by blocked members,
/// and items belonging to hidden groups or forum content.
#[derive(Debug, Clone, Copy)]
pub struct ActivityModeration {
    modules: ModuleAvailability,
}

impl ActivityModeration {
    #[must_use]
    pub const fn new(modules: ModuleAvailability) -> Self {
        Self { modules }
    }

    /// `user_id NOT IN (hidden members)`.
    pub async fn exclude_member_activity_query(
        &self,
        registry: &QueryFilterRegistry,
        viewer_id: Option<i64>,
    ) -> Option<Predicate> {
        let hidden_members = registry
            .hidden_ids(HideSource::Moderation, ContentType::Member, viewer_id)
            .await;
        Predicate::not_in(columns::ACTIVITY_USER_ID, hidden_members)
    }

    /// Excludes group activity of hidden groups.
    pub async fn exclude_group_activity_query(
        &self,
        registry: &QueryFilterRegistry,
        viewer_id: Option<i64>,
    ) -> Option<Predicate> {
        let hidden_groups = registry
            .hidden_ids(HideSource::Moderation, ContentType::Group, viewer_id)
            .await;
        exclude_component_items(COMPONENT_GROUPS, hidden_groups)
    }

    /// Excludes forum activity of hidden forums, topics and replies.
    pub async fn exclude_forums_activity_query(
        &self,
        registry: &QueryFilterRegistry,
        viewer_id: Option<i64>,
    ) -> Option<Predicate> {
        let mut hidden = IdSet::new();
        for content_type in [ContentType::Forum, ContentType::Topic, ContentType::Reply] {
            hidden.extend(
                registry
                    .hidden_ids(HideSource::Moderation, content_type, viewer_id)
                    .await,
            );
        }
        exclude_component_items(COMPONENT_FORUMS, hidden)
    }

    async fn hidden_group_activity_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let hidden_groups = registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Group)
            .await;
        component_activity_ids(registry, COMPONENT_GROUPS, hidden_groups).await
    }

    async fn hidden_forum_activity_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let mut hidden = IdSet::new();
        for content_type in [ContentType::Forum, ContentType::Topic, ContentType::Reply] {
            hidden.extend(
                registry
                    .sitewide_hidden_ids(HideSource::Moderation, content_type)
                    .await,
            );
        }
        component_activity_ids(registry, COMPONENT_FORUMS, hidden).await
    }
}

#[async_trait]
impl ContentTypeAdapter for ActivityModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Activity
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }

    async fn where_clauses(&self, ctx: &ExclusionContext<'_>) -> WhereConditions {
        let viewer_id = ctx.args.viewer_id;
        let mut clauses = WhereConditions::new();
        clauses.insert(ContentType::Activity.where_key(), self.exclude_where_query());
        clauses.insert_some(
            ContentType::Member.where_key(),
            self.exclude_member_activity_query(ctx.registry, viewer_id)
                .await,
        );

        if self.modules.groups {
            clauses.insert_some(
                ContentType::Group.where_key(),
                self.exclude_group_activity_query(ctx.registry, viewer_id)
                    .await,
            );
        }

        if self.modules.forums {
            clauses.insert_some(
                ContentType::Forum.where_key(),
                self.exclude_forums_activity_query(ctx.registry, viewer_id)
                    .await,
            );
        }

        clauses
    }

    async fn sitewide_hidden_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let mut ids = registry
            .direct_hidden_ids(HideSource::Moderation, ContentType::Activity)
            .await;

        if self.modules.groups {
            ids.extend(self.hidden_group_activity_ids(registry).await);
        }
        if self.modules.forums {
            ids.extend(self.hidden_forum_activity_ids(registry).await);
        }

        ids
    }
}

/// `component <> '<component>' OR item_id NOT IN (hidden)`.
fn exclude_component_items(component: &str, hidden: IdSet) -> Option<Predicate> {
    let not_hidden = Predicate::not_in(columns::ACTIVITY_ITEM_ID, hidden)?;
    Predicate::any([
        Predicate::ne(columns::ACTIVITY_COMPONENT, component),
        not_hidden,
    ])
}

async fn component_activity_ids(
    registry: &QueryFilterRegistry,
    component: &str,
    parents: IdSet,
) -> IdSet {
    if parents.is_empty() {
        return IdSet::new();
    }

    registry
        .lookup_ids(ActivityFilter {
            primary_ids: Some(parents),
            object: Some(component.to_string()),
            ..ActivityFilter::default()
        })
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreeset;

    #[test]
    fn test_component_clause_requires_hidden_items() {
        assert!(exclude_component_items(COMPONENT_GROUPS, IdSet::new()).is_none());

        let clause = exclude_component_items(COMPONENT_GROUPS, btreeset! {42}).unwrap();
        assert_eq!(
            clause,
            Predicate::Or(vec![
                Predicate::ne(columns::ACTIVITY_COMPONENT, "groups"),
                Predicate::NotIn(columns::ACTIVITY_ITEM_ID, btreeset! {42}),
            ])
        );
    }
}
