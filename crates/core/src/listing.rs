//! Listing queries for the feature modules' content, run through the
//! exclusion filters the same way the host's own listing code is.

use sea_orm::{ActiveEnum, EntityTrait, QueryOrder, QuerySelect, Select};
use shroud_common::{AppError, AppResult};
use shroud_db::entities::{
    Activity, ContentType, Forum, ForumReply, ForumTopic, Group, User, group::GroupStatus,
};

use crate::query::{ColumnPath, IdSet, Predicate, QueryArgs, WhereConditions, columns};
use crate::registry::QueryFilterRegistry;

/// Filters one content type's listing understands.
pub trait ListingFilter: Send + Sync {
    type Entity: EntityTrait;

    const CONTENT_TYPE: ContentType;

    /// The listing's own where clauses, or `None` if nothing can match.
    fn conditions(&self, show_hidden: bool) -> Option<WhereConditions>;
}

/// A page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub filter: F,
    /// Page size; `0` returns every match.
    pub per_page: u64,
    /// 1-based page number.
    pub page: u64,
    /// Include items the feature module itself hides from listings.
    pub show_hidden: bool,
    pub args: QueryArgs,
}

impl<F> ListQuery<F> {
    pub const DEFAULT_PER_PAGE: u64 = 20;

    pub const fn new(filter: F) -> Self {
        Self {
            filter,
            per_page: Self::DEFAULT_PER_PAGE,
            page: 1,
            show_hidden: false,
            args: QueryArgs {
                moderation_query: None,
                viewer_id: None,
            },
        }
    }

    /// Every matching ID, hidden ones included, with no exclusion filters.
    /// Hidden ID sets are computed from these lookups.
    pub const fn lookup(filter: F) -> Self {
        Self {
            filter,
            per_page: 0,
            page: 1,
            show_hidden: true,
            args: QueryArgs::unmoderated(),
        }
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    #[must_use]
    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub fn show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    #[must_use]
    pub fn args(mut self, args: QueryArgs) -> Self {
        self.args = args;
        self
    }

    const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Runs listing queries against the registry's database.
#[derive(Clone, Copy)]
pub struct Listing<'a> {
    registry: &'a QueryFilterRegistry,
}

impl<'a> Listing<'a> {
    #[must_use]
    pub const fn new(registry: &'a QueryFilterRegistry) -> Self {
        Self { registry }
    }

    async fn select<F: ListingFilter>(
        &self,
        query: &ListQuery<F>,
    ) -> Option<Select<F::Entity>> {
        let conditions = query.filter.conditions(query.show_hidden)?;
        let primary_key = columns::primary_key(F::CONTENT_TYPE).to_simple_expr();

        let mut select = self
            .registry
            .filter_select(
                F::Entity::find(),
                F::CONTENT_TYPE,
                conditions,
                &query.args,
            )
            .await
            .order_by_asc(primary_key);

        if query.per_page > 0 {
            select = select.limit(query.per_page).offset(query.offset());
        }
        Some(select)
    }

    /// IDs of the matching items.
    pub async fn ids<F: ListingFilter>(&self, query: &ListQuery<F>) -> AppResult<Vec<i64>> {
        let Some(select) = self.select(query).await else {
            return Ok(Vec::new());
        };
        let primary_key = columns::primary_key(F::CONTENT_TYPE).to_simple_expr();

        select
            .select_only()
            .column_as(primary_key, "id")
            .into_tuple::<i64>()
            .all(self.registry.connection())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The matching items.
    pub async fn items<F: ListingFilter>(
        &self,
        query: &ListQuery<F>,
    ) -> AppResult<Vec<<F::Entity as EntityTrait>::Model>> {
        let Some(select) = self.select(query).await else {
            return Ok(Vec::new());
        };

        select
            .all(self.registry.connection())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Restrict `column` to `ids` when given; `None` if `ids` is empty.
fn insert_ids(
    conditions: &mut WhereConditions,
    name: &str,
    column: ColumnPath,
    ids: Option<&IdSet>,
) -> Option<()> {
    if let Some(ids) = ids {
        conditions.insert(name, Predicate::in_ids(column, ids.iter().copied())?);
    }
    Some(())
}

/// Activity stream filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Restrict to these primary items (`item_id`).
    pub primary_ids: Option<IdSet>,
    /// Restrict to one component.
    pub object: Option<String>,
    pub user_id: Option<i64>,
    pub activity_type: Option<String>,
}

impl ListingFilter for ActivityFilter {
    type Entity = Activity;

    const CONTENT_TYPE: ContentType = ContentType::Activity;

    fn conditions(&self, show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(
            &mut conditions,
            "primary_id",
            columns::ACTIVITY_ITEM_ID,
            self.primary_ids.as_ref(),
        )?;
        if let Some(object) = &self.object {
            conditions.insert("object", Predicate::eq(columns::ACTIVITY_COMPONENT, object.as_str()));
        }
        if let Some(user_id) = self.user_id {
            conditions.insert("user_id", Predicate::eq(columns::ACTIVITY_USER_ID, user_id));
        }
        if let Some(activity_type) = &self.activity_type {
            conditions.insert(
                "type",
                Predicate::eq(columns::ACTIVITY_TYPE, activity_type.as_str()),
            );
        }
        if !show_hidden {
            conditions.insert(
                "hidden",
                Predicate::eq(columns::ACTIVITY_HIDE_SITEWIDE, false),
            );
        }
        Some(conditions)
    }
}

/// Group directory filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub ids: Option<IdSet>,
    pub creator_id: Option<i64>,
}

impl ListingFilter for GroupFilter {
    type Entity = Group;

    const CONTENT_TYPE: ContentType = ContentType::Group;

    fn conditions(&self, show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(&mut conditions, "include", columns::GROUP_ID, self.ids.as_ref())?;
        if let Some(creator_id) = self.creator_id {
            conditions.insert(
                "creator_id",
                Predicate::eq(columns::GROUP_CREATOR_ID, creator_id),
            );
        }
        if !show_hidden {
            conditions.insert(
                "hidden",
                Predicate::ne(columns::GROUP_STATUS, GroupStatus::Hidden.to_value()),
            );
        }
        Some(conditions)
    }
}

/// Forum index filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForumFilter {
    pub ids: Option<IdSet>,
    pub group_ids: Option<IdSet>,
    pub author_id: Option<i64>,
}

impl ListingFilter for ForumFilter {
    type Entity = Forum;

    const CONTENT_TYPE: ContentType = ContentType::Forum;

    fn conditions(&self, _show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(&mut conditions, "include", columns::FORUM_ID, self.ids.as_ref())?;
        insert_ids(
            &mut conditions,
            "group_id",
            columns::FORUM_GROUP_ID,
            self.group_ids.as_ref(),
        )?;
        if let Some(author_id) = self.author_id {
            conditions.insert("author_id", Predicate::eq(columns::FORUM_AUTHOR_ID, author_id));
        }
        Some(conditions)
    }
}

/// Topic listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    pub ids: Option<IdSet>,
    pub forum_ids: Option<IdSet>,
    pub author_id: Option<i64>,
}

impl ListingFilter for TopicFilter {
    type Entity = ForumTopic;

    const CONTENT_TYPE: ContentType = ContentType::Topic;

    fn conditions(&self, _show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(&mut conditions, "include", columns::TOPIC_ID, self.ids.as_ref())?;
        insert_ids(
            &mut conditions,
            "forum_id",
            columns::TOPIC_FORUM_ID,
            self.forum_ids.as_ref(),
        )?;
        if let Some(author_id) = self.author_id {
            conditions.insert("author_id", Predicate::eq(columns::TOPIC_AUTHOR_ID, author_id));
        }
        Some(conditions)
    }
}

/// Reply listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyFilter {
    pub ids: Option<IdSet>,
    pub topic_ids: Option<IdSet>,
    pub author_id: Option<i64>,
}

impl ListingFilter for ReplyFilter {
    type Entity = ForumReply;

    const CONTENT_TYPE: ContentType = ContentType::Reply;

    fn conditions(&self, _show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(&mut conditions, "include", columns::REPLY_ID, self.ids.as_ref())?;
        insert_ids(
            &mut conditions,
            "topic_id",
            columns::REPLY_TOPIC_ID,
            self.topic_ids.as_ref(),
        )?;
        if let Some(author_id) = self.author_id {
            conditions.insert("author_id", Predicate::eq(columns::REPLY_AUTHOR_ID, author_id));
        }
        Some(conditions)
    }
}

/// Member directory filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub ids: Option<IdSet>,
}

impl ListingFilter for MemberFilter {
    type Entity = User;

    const CONTENT_TYPE: ContentType = ContentType::Member;

    fn conditions(&self, _show_hidden: bool) -> Option<WhereConditions> {
        let mut conditions = WhereConditions::new();
        insert_ids(&mut conditions, "include", columns::MEMBER_ID, self.ids.as_ref())?;
        Some(conditions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use maplit::btreeset;

    #[test]
    fn test_empty_id_filter_matches_nothing() {
        let filter = GroupFilter {
            ids: Some(IdSet::new()),
            ..GroupFilter::default()
        };
        assert!(filter.conditions(false).is_none());
    }

    #[test]
    fn test_activity_filter_clauses() {
        let filter = ActivityFilter {
            primary_ids: Some(btreeset! {42}),
            object: Some("groups".to_string()),
            ..ActivityFilter::default()
        };

        let conditions = filter.conditions(true).unwrap();
        assert_eq!(conditions.keys().collect::<Vec<_>>(), ["primary_id", "object"]);

        let conditions = filter.conditions(false).unwrap();
        assert!(conditions.contains_key("hidden"));
    }

    #[test]
    fn test_lookup_query_shape() {
        let query = ListQuery::lookup(MemberFilter::default());
        assert_eq!(query.per_page, 0);
        assert!(query.show_hidden);
        assert!(query.args.bypasses_moderation());
    }

    #[test]
    fn test_offset() {
        let query = ListQuery::new(MemberFilter::default()).per_page(10).page(3);
        assert_eq!(query.offset(), 20);
        assert_eq!(ListQuery::new(MemberFilter::default()).page(0).offset(), 0);
    }
}
