use async_trait::async_trait;
use shroud_db::entities::{ContentType, HideSource};

use crate::adapter::ContentTypeAdapter;
use crate::query::{Predicate, WhereConditions, columns};
use crate::registry::ExclusionContext;

/// Hidden groups, and groups created by blocked members.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupModeration;

#[async_trait]
impl ContentTypeAdapter for GroupModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Group
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }

    async fn where_clauses(&self, ctx: &ExclusionContext<'_>) -> WhereConditions {
        let mut clauses = WhereConditions::new();
        clauses.insert(ContentType::Group.where_key(), self.exclude_where_query());

        let hidden_members = ctx
            .registry
            .hidden_ids(HideSource::Moderation, ContentType::Member, ctx.args.viewer_id)
            .await;
        clauses.insert_some(
            ContentType::Member.where_key(),
            Predicate::not_in(columns::GROUP_CREATOR_ID, hidden_members),
        );

        clauses
    }
}
