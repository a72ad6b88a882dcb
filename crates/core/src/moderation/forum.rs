use async_trait::async_trait;
use shroud_db::entities::{ContentType, HideSource};

use crate::adapter::ContentTypeAdapter;
use crate::listing::{ForumFilter, ReplyFilter, TopicFilter};
use crate::modules::ModuleAvailability;
use crate::query::{ColumnPath, IdSet, Predicate, WhereConditions, columns};
use crate::registry::{ExclusionContext, QueryFilterRegistry};

async fn hidden_members_clause(ctx: &ExclusionContext<'_>, column: ColumnPath) -> Option<Predicate> {
    let hidden_members = ctx
        .registry
        .hidden_ids(HideSource::Moderation, ContentType::Member, ctx.args.viewer_id)
        .await;
    Predicate::not_in(column, hidden_members)
}

/// Hidden forums: direct hides, forums started by blocked members, and
/// forums of hidden groups.
#[derive(Debug, Clone, Copy)]
pub struct ForumModeration {
    modules: ModuleAvailability,
}

impl ForumModeration {
    #[must_use]
    pub const fn new(modules: ModuleAvailability) -> Self {
        Self { modules }
    }
}

#[async_trait]
impl ContentTypeAdapter for ForumModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Forum
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }

    async fn where_clauses(&self, ctx: &ExclusionContext<'_>) -> WhereConditions {
        let mut clauses = WhereConditions::new();
        clauses.insert(ContentType::Forum.where_key(), self.exclude_where_query());
        clauses.insert_some(
            ContentType::Member.where_key(),
            hidden_members_clause(ctx, columns::FORUM_AUTHOR_ID).await,
        );

        if self.modules.groups {
            let hidden_groups = ctx
                .registry
                .hidden_ids(HideSource::Moderation, ContentType::Group, ctx.args.viewer_id)
                .await;
            // Sitewide forums have no group.
            let group_clause = Predicate::not_in(columns::FORUM_GROUP_ID, hidden_groups)
                .and_then(|not_hidden| {
                    Predicate::any([Predicate::is_null(columns::FORUM_GROUP_ID), not_hidden])
                });
            clauses.insert_some(ContentType::Group.where_key(), group_clause);
        }

        clauses
    }

    async fn sitewide_hidden_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let mut ids = registry
            .direct_hidden_ids(HideSource::Moderation, ContentType::Forum)
            .await;

        if self.modules.groups {
            let hidden_groups = registry
                .sitewide_hidden_ids(HideSource::Moderation, ContentType::Group)
                .await;
            if !hidden_groups.is_empty() {
                ids.extend(
                    registry
                        .lookup_ids(ForumFilter {
                            group_ids: Some(hidden_groups),
                            ..ForumFilter::default()
                        })
                        .await,
                );
            }
        }

        ids
    }
}

/// Hidden topics: direct hides, topics by blocked members, and topics of
/// hidden forums.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicModeration;

#[async_trait]
impl ContentTypeAdapter for TopicModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Topic
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }

    async fn where_clauses(&self, ctx: &ExclusionContext<'_>) -> WhereConditions {
        let mut clauses = WhereConditions::new();
        clauses.insert(ContentType::Topic.where_key(), self.exclude_where_query());
        clauses.insert_some(
            ContentType::Member.where_key(),
            hidden_members_clause(ctx, columns::TOPIC_AUTHOR_ID).await,
        );

        let hidden_forums = ctx
            .registry
            .hidden_ids(HideSource::Moderation, ContentType::Forum, ctx.args.viewer_id)
            .await;
        clauses.insert_some(
            ContentType::Forum.where_key(),
            Predicate::not_in(columns::TOPIC_FORUM_ID, hidden_forums),
        );

        clauses
    }

    async fn sitewide_hidden_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let mut ids = registry
            .direct_hidden_ids(HideSource::Moderation, ContentType::Topic)
            .await;

        let hidden_forums = registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Forum)
            .await;
        if !hidden_forums.is_empty() {
            ids.extend(
                registry
                    .lookup_ids(TopicFilter {
                        forum_ids: Some(hidden_forums),
                        ..TopicFilter::default()
                    })
                    .await,
            );
        }

        ids
    }
}

/// Hidden replies: direct hides, replies by blocked members, and replies in
/// hidden topics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyModeration;

#[async_trait]
impl ContentTypeAdapter for ReplyModeration {
    fn content_type(&self) -> ContentType {
        ContentType::Reply
    }

    fn source(&self) -> HideSource {
        HideSource::Moderation
    }

    async fn where_clauses(&self, ctx: &ExclusionContext<'_>) -> WhereConditions {
        let mut clauses = WhereConditions::new();
        clauses.insert(ContentType::Reply.where_key(), self.exclude_where_query());
        clauses.insert_some(
            ContentType::Member.where_key(),
            hidden_members_clause(ctx, columns::REPLY_AUTHOR_ID).await,
        );

        let hidden_topics = ctx
            .registry
            .hidden_ids(HideSource::Moderation, ContentType::Topic, ctx.args.viewer_id)
            .await;
        clauses.insert_some(
            ContentType::Topic.where_key(),
            Predicate::not_in(columns::REPLY_TOPIC_ID, hidden_topics),
        );

        clauses
    }

    async fn sitewide_hidden_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        let mut ids = registry
            .direct_hidden_ids(HideSource::Moderation, ContentType::Reply)
            .await;

        let hidden_topics = registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Topic)
            .await;
        if !hidden_topics.is_empty() {
            ids.extend(
                registry
                    .lookup_ids(ReplyFilter {
                        topic_ids: Some(hidden_topics),
                        ..ReplyFilter::default()
                    })
                    .await,
            );
        }

        ids
    }
}
