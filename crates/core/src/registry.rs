//! Registry of exclusion filters that listing code runs its queries through.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Select};
use shroud_db::entities::{ContentType, HideSource};
use shroud_db::repositories::{GroupRepository, HiddenRecordRepository};
use tracing::warn;

use crate::adapter::{ContentTypeAdapter, SuspendAdapter};
use crate::listing::{ListQuery, Listing, ListingFilter};
use crate::moderation::{
    ActivityModeration, ForumModeration, GroupModeration, MemberModeration, ReplyModeration,
    TopicModeration,
};
use crate::modules::ModuleAvailability;
use crate::query::{IdSet, JoinClauses, QueryArgs, WhereConditions};
use crate::suspend::{
    ActivitySuspend, ForumSuspend, GroupSuspend, MemberSuspend, ReplySuspend, TopicSuspend,
};

/// Extension point run by every adapter of one role and content type after
/// it has built its own joins and where clauses.
pub trait ExclusionMiddleware: Send + Sync {
    fn extend_join(&self, _joins: &mut JoinClauses, _ctx: &ExclusionContext<'_>) {}

    fn extend_where(&self, _conditions: &mut WhereConditions, _ctx: &ExclusionContext<'_>) {}
}

/// What an adapter sees while it filters one query.
#[derive(Clone, Copy)]
pub struct ExclusionContext<'a> {
    pub registry: &'a QueryFilterRegistry,
    pub args: &'a QueryArgs,
}

/// Adapters for every active content type, in both roles.
pub struct QueryFilterRegistry {
    db: Arc<DatabaseConnection>,
    modules: ModuleAvailability,
    hidden_records: HiddenRecordRepository,
    groups: GroupRepository,
    adapters: BTreeMap<(HideSource, ContentType), Arc<dyn ContentTypeAdapter>>,
    suspend: BTreeMap<ContentType, Arc<dyn SuspendAdapter>>,
    middleware: HashMap<(HideSource, ContentType), Vec<Arc<dyn ExclusionMiddleware>>>,
}

impl QueryFilterRegistry {
    /// Create a registry with no adapters installed.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, modules: ModuleAvailability) -> Self {
        Self {
            hidden_records: HiddenRecordRepository::new(db.clone()),
            groups: GroupRepository::new(db.clone()),
            db,
            modules,
            adapters: BTreeMap::new(),
            suspend: BTreeMap::new(),
            middleware: HashMap::new(),
        }
    }

    /// Create a registry with both roles installed for every active module.
    #[must_use]
    pub fn with_defaults(db: Arc<DatabaseConnection>, modules: ModuleAvailability) -> Self {
        let mut registry = Self::new(db, modules);

        registry.register(MemberModeration);
        registry.register_suspend(MemberSuspend::new(modules));

        if modules.activity {
            registry.register(ActivityModeration::new(modules));
            registry.register_suspend(ActivitySuspend);
        }
        if modules.groups {
            registry.register(GroupModeration);
            registry.register_suspend(GroupSuspend::new(modules));
        }
        if modules.forums {
            registry.register(ForumModeration::new(modules));
            registry.register(TopicModeration);
            registry.register(ReplyModeration);
            registry.register_suspend(ForumSuspend);
            registry.register_suspend(TopicSuspend);
            registry.register_suspend(ReplySuspend);
        }

        registry
    }

    /// Install an adapter, replacing any adapter for the same role and type.
    pub fn register<A: ContentTypeAdapter + 'static>(&mut self, adapter: A) {
        self.adapters
            .insert((adapter.source(), adapter.content_type()), Arc::new(adapter));
    }

    /// Install a suspend adapter, which also takes part in hide cascades.
    pub fn register_suspend<A: SuspendAdapter + 'static>(&mut self, adapter: A) {
        let adapter = Arc::new(adapter);
        let key = adapter.content_type();
        self.adapters
            .insert((adapter.source(), key), adapter.clone());
        self.suspend.insert(key, adapter);
    }

    /// Add an extension for one role and content type.
    pub fn register_middleware(
        &mut self,
        source: HideSource,
        content_type: ContentType,
        middleware: Arc<dyn ExclusionMiddleware>,
    ) {
        self.middleware
            .entry((source, content_type))
            .or_default()
            .push(middleware);
    }

    #[must_use]
    pub const fn modules(&self) -> ModuleAvailability {
        self.modules
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    #[must_use]
    pub const fn hidden_records(&self) -> &HiddenRecordRepository {
        &self.hidden_records
    }

    #[must_use]
    pub const fn groups(&self) -> &GroupRepository {
        &self.groups
    }

    #[must_use]
    pub fn adapter(
        &self,
        source: HideSource,
        content_type: ContentType,
    ) -> Option<&Arc<dyn ContentTypeAdapter>> {
        self.adapters.get(&(source, content_type))
    }

    #[must_use]
    pub fn suspend_adapter(&self, content_type: ContentType) -> Option<&Arc<dyn SuspendAdapter>> {
        self.suspend.get(&content_type)
    }

    /// Middleware registered for one role and content type.
    #[must_use]
    pub fn middleware(
        &self,
        source: HideSource,
        content_type: ContentType,
    ) -> &[Arc<dyn ExclusionMiddleware>] {
        self.middleware
            .get(&(source, content_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn adapters_for(
        &self,
        content_type: ContentType,
    ) -> impl Iterator<Item = &Arc<dyn ContentTypeAdapter>> + '_ {
        [HideSource::Moderation, HideSource::Suspend]
            .into_iter()
            .filter_map(move |source| self.adapter(source, content_type))
    }

    /// Let every adapter of `content_type` append its exclusion joins.
    pub fn update_join_sql(
        &self,
        content_type: ContentType,
        joins: &mut JoinClauses,
        args: &QueryArgs,
    ) {
        let ctx = ExclusionContext {
            registry: self,
            args,
        };
        for adapter in self.adapters_for(content_type) {
            adapter.update_join_sql(joins, &ctx);
        }
    }

    /// Let every adapter of `content_type` merge its exclusion clause.
    pub async fn update_where_sql(
        &self,
        content_type: ContentType,
        conditions: &mut WhereConditions,
        args: &QueryArgs,
    ) {
        let ctx = ExclusionContext {
            registry: self,
            args,
        };
        for adapter in self.adapters_for(content_type) {
            adapter.update_where_sql(conditions, &ctx).await;
        }
    }

    /// Filter hidden items of `content_type` out of `select`.
    pub async fn apply_exclusions<E: EntityTrait>(
        &self,
        select: Select<E>,
        content_type: ContentType,
        args: &QueryArgs,
    ) -> Select<E> {
        self.filter_select(select, content_type, WhereConditions::new(), args)
            .await
    }

    /// Apply the listing's own `conditions` together with the exclusions.
    pub async fn filter_select<E: EntityTrait>(
        &self,
        mut select: Select<E>,
        content_type: ContentType,
        mut conditions: WhereConditions,
        args: &QueryArgs,
    ) -> Select<E> {
        let mut joins = JoinClauses::new();
        self.update_join_sql(content_type, &mut joins, args);
        self.update_where_sql(content_type, &mut conditions, args)
            .await;

        for join in &joins {
            join.apply(QuerySelect::query(&mut select));
        }

        match conditions.into_predicate() {
            Some(predicate) => select.filter(predicate.to_condition()),
            None => select,
        }
    }

    /// Listing queries routed through this registry.
    #[must_use]
    pub const fn listing(&self) -> Listing<'_> {
        Listing::new(self)
    }

    /// Hidden IDs of `content_type` for a viewer; empty when the type's
    /// module is inactive.
    pub async fn hidden_ids(
        &self,
        source: HideSource,
        content_type: ContentType,
        viewer_id: Option<i64>,
    ) -> IdSet {
        match self.adapter(source, content_type) {
            Some(adapter) => adapter.hidden_ids(self, viewer_id).await,
            None => IdSet::new(),
        }
    }

    /// Sitewide hidden IDs of `content_type`; empty when the type's module
    /// is inactive.
    pub async fn sitewide_hidden_ids(
        &self,
        source: HideSource,
        content_type: ContentType,
    ) -> IdSet {
        match self.adapter(source, content_type) {
            Some(adapter) => adapter.sitewide_hidden_ids(self).await,
            None => IdSet::new(),
        }
    }

    /// Items with a sitewide hidden record of their own.
    pub async fn direct_hidden_ids(&self, source: HideSource, content_type: ContentType) -> IdSet {
        match self
            .hidden_records
            .sitewide_item_ids(source, content_type)
            .await
        {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, %source, %content_type, "Failed to load hidden items");
                IdSet::new()
            }
        }
    }

    /// Items a viewer hid for themselves.
    pub async fn personal_hidden_ids(
        &self,
        source: HideSource,
        content_type: ContentType,
        viewer_id: i64,
    ) -> IdSet {
        match self
            .hidden_records
            .personal_item_ids(source, content_type, viewer_id)
            .await
        {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, %source, %content_type, viewer_id, "Failed to load personal hides");
                IdSet::new()
            }
        }
    }

    /// IDs matched by an unfiltered lookup, or nothing if it fails.
    pub async fn lookup_ids<F: ListingFilter>(&self, filter: F) -> IdSet {
        let query = ListQuery::lookup(filter);
        match self.listing().ids(&query).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(error = %e, content_type = %F::CONTENT_TYPE, "Lookup failed");
                IdSet::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::{ColumnPath, Predicate};
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait, sea_query::PostgresQueryBuilder};
    use shroud_db::entities::Group;

    fn empty_registry(modules: ModuleAvailability) -> QueryFilterRegistry {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        QueryFilterRegistry::with_defaults(db, modules)
    }

    struct PrivateGroups;

    impl ExclusionMiddleware for PrivateGroups {
        fn extend_where(&self, conditions: &mut WhereConditions, _ctx: &ExclusionContext<'_>) {
            conditions.insert(
                "private_where",
                Predicate::ne(ColumnPath::new("groups", "status"), "private"),
            );
        }
    }

    #[test]
    fn test_defaults_follow_modules() {
        let registry = empty_registry(ModuleAvailability {
            groups: false,
            ..ModuleAvailability::all()
        });

        assert!(registry.adapter(HideSource::Moderation, ContentType::Activity).is_some());
        assert!(registry.adapter(HideSource::Moderation, ContentType::Group).is_none());
        assert!(registry.suspend_adapter(ContentType::Group).is_none());
        assert!(registry.suspend_adapter(ContentType::Member).is_some());
        assert!(registry.adapter(HideSource::Suspend, ContentType::Reply).is_some());
    }

    #[test]
    fn test_members_only_site() {
        let registry = empty_registry(ModuleAvailability::members_only());

        for content_type in ContentType::ALL {
            let expected = content_type == ContentType::Member;
            assert_eq!(
                registry.adapter(HideSource::Moderation, content_type).is_some(),
                expected
            );
        }
    }

    #[test]
    fn test_update_join_sql_adds_one_join_per_role() {
        let registry = empty_registry(ModuleAvailability::all());
        let mut joins = JoinClauses::new();

        registry.update_join_sql(ContentType::Group, &mut joins, &QueryArgs::default());

        let aliases: Vec<_> = joins.iter().map(|join| join.alias.as_str()).collect();
        assert_eq!(aliases, ["mo", "s"]);
    }

    #[test]
    fn test_update_join_sql_opt_out_is_untouched() {
        let registry = empty_registry(ModuleAvailability::all());
        let mut joins = JoinClauses::new();

        registry.update_join_sql(ContentType::Group, &mut joins, &QueryArgs::unmoderated());

        assert!(joins.is_empty());
    }

    #[tokio::test]
    async fn test_opt_out_select_is_identical() {
        let registry = empty_registry(ModuleAvailability::all());
        let expected = QueryTrait::as_query(&Group::find()).to_string(PostgresQueryBuilder);

        let filtered = registry
            .apply_exclusions(Group::find(), ContentType::Group, &QueryArgs::unmoderated())
            .await;

        assert_eq!(
            QueryTrait::as_query(&filtered).to_string(PostgresQueryBuilder),
            expected
        );
    }

    #[tokio::test]
    async fn test_middleware_extends_suspend_where() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut registry = QueryFilterRegistry::new(db, ModuleAvailability::all());
        registry.register_suspend(GroupSuspend::new(ModuleAvailability::all()));
        registry.register_middleware(
            HideSource::Suspend,
            ContentType::Group,
            Arc::new(PrivateGroups),
        );

        let select = registry
            .apply_exclusions(Group::find(), ContentType::Group, &QueryArgs::default())
            .await;
        let sql = QueryTrait::as_query(&select).to_string(PostgresQueryBuilder);

        assert!(sql.contains(r#"LEFT JOIN "hidden_record" AS "s""#), "{sql}");
        assert!(sql.contains(r#""s"."id" IS NULL"#), "{sql}");
        assert!(sql.contains(r#""groups"."status" <> 'private'"#), "{sql}");
    }
}
