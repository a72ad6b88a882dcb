//! The per-content-type exclusion filter contract.
//!
//! Every content type gets one adapter per [`HideSource`]. The provided
//! methods hold the behavior shared by all adapters: opting out, running the
//! registered middleware, and merging the composed clause into the listing's
//! where conditions. Implementors supply their dependency clauses and hidden
//! ID sets.

use std::collections::BTreeMap;

use async_trait::async_trait;
use shroud_common::AppResult;
use shroud_db::entities::{ContentType, HideSource};
use shroud_db::repositories::{HiddenRecordRemoval, NewHiddenRecord};
use tracing::debug;

use crate::query::{
    ColumnPath, IdSet, JoinClauses, JoinFragment, Predicate, QueryArgs, WhereConditions, columns,
};
use crate::registry::{ExclusionContext, QueryFilterRegistry};

/// Table both roles record hides in.
pub const HIDDEN_RECORD_TABLE: &str = "hidden_record";

/// Items to cascade a hide or unhide into, per content type.
pub type RelatedContents = BTreeMap<ContentType, Vec<i64>>;

/// Exclusion filter for one content type and one role.
#[async_trait]
pub trait ContentTypeAdapter: Send + Sync {
    fn content_type(&self) -> ContentType;

    fn source(&self) -> HideSource;

    /// Join pulling in the hidden records of this role that apply to the
    /// viewer, matched against `column`.
    fn exclude_joint_query(&self, column: ColumnPath, args: &QueryArgs) -> JoinFragment {
        exclusion_join(self.source(), self.content_type(), column, args.viewer_id)
    }

    /// Keeps rows the exclusion join found nothing for.
    fn exclude_where_query(&self) -> Predicate {
        Predicate::is_null(ColumnPath::new(self.source().join_alias(), "id"))
    }

    /// Named sub-clauses before middleware runs.
    async fn where_clauses(&self, _ctx: &ExclusionContext<'_>) -> WhereConditions {
        let mut clauses = WhereConditions::new();
        clauses.insert(self.content_type().where_key(), self.exclude_where_query());
        clauses
    }

    /// IDs hidden for every viewer.
    async fn sitewide_hidden_ids(&self, registry: &QueryFilterRegistry) -> IdSet {
        registry
            .direct_hidden_ids(self.source(), self.content_type())
            .await
    }

    /// IDs hidden for `viewer_id`: the sitewide set plus the viewer's own hides.
    async fn hidden_ids(&self, registry: &QueryFilterRegistry, viewer_id: Option<i64>) -> IdSet {
        let mut ids = self.sitewide_hidden_ids(registry).await;
        if let Some(viewer) = viewer_id {
            ids.extend(
                registry
                    .personal_hidden_ids(self.source(), self.content_type(), viewer)
                    .await,
            );
        }
        ids
    }

    fn update_join_sql(&self, joins: &mut JoinClauses, ctx: &ExclusionContext<'_>) {
        if ctx.args.bypasses_moderation() {
            return;
        }

        joins.push(self.exclude_joint_query(columns::primary_key(self.content_type()), ctx.args));
        for middleware in ctx.registry.middleware(self.source(), self.content_type()) {
            middleware.extend_join(joins, ctx);
        }
    }

    async fn update_where_sql(&self, conditions: &mut WhereConditions, ctx: &ExclusionContext<'_>) {
        if ctx.args.bypasses_moderation() {
            return;
        }

        let mut clauses = self.where_clauses(ctx).await;
        for middleware in ctx.registry.middleware(self.source(), self.content_type()) {
            middleware.extend_where(&mut clauses, ctx);
        }

        debug!(
            content_type = %self.content_type(),
            source = %self.source(),
            clauses = ?clauses.keys().collect::<Vec<_>>(),
            "Composed exclusion clauses"
        );

        conditions.insert_some(self.source().where_key(), clauses.into_predicate());
    }
}

/// Who is hiding an item, and through which parent if it is a cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuspendArgs {
    /// Viewer the hide is scoped to; `None` for admin actions.
    pub user_id: Option<i64>,
    /// Item whose hide cascaded into this one.
    pub parent: Option<(ContentType, i64)>,
}

impl SuspendArgs {
    #[must_use]
    pub const fn by_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            parent: None,
        }
    }

    #[must_use]
    pub const fn cascaded_from(self, content_type: ContentType, item_id: i64) -> Self {
        Self {
            user_id: self.user_id,
            parent: Some((content_type, item_id)),
        }
    }
}

/// A suspend-role adapter, which also owns the hide/unhide cascade.
#[async_trait]
pub trait SuspendAdapter: ContentTypeAdapter {
    /// Items hidden together with `item_id`.
    async fn related_contents(
        &self,
        item_id: i64,
        registry: &QueryFilterRegistry,
    ) -> RelatedContents;

    /// Record the hide, then cascade it to related content.
    async fn manage_hidden(
        &self,
        item_id: i64,
        hide_sitewide: Option<bool>,
        args: &SuspendArgs,
        registry: &QueryFilterRegistry,
    ) -> AppResult<()> {
        registry
            .hidden_records()
            .add(NewHiddenRecord {
                source: HideSource::Suspend,
                item_type: self.content_type(),
                item_id,
                user_id: args.user_id,
                hide_sitewide,
                parent: args.parent,
            })
            .await?;

        hide_related_content(self, item_id, hide_sitewide, args, registry).await
    }

    /// Remove the hide, then cascade the unhide to related content.
    ///
    /// A cascaded unhide only drops the link to its parent. The cascade stops
    /// at items that stay hidden through a direct hide or another parent.
    async fn manage_unhidden(
        &self,
        item_id: i64,
        hide_sitewide: Option<bool>,
        force_all: bool,
        args: &SuspendArgs,
        registry: &QueryFilterRegistry,
    ) -> AppResult<()> {
        let removed = registry
            .hidden_records()
            .remove(HiddenRecordRemoval {
                source: HideSource::Suspend,
                item_type: self.content_type(),
                item_id,
                user_id: args.user_id,
                hide_sitewide,
                parent: args.parent,
                force_all,
            })
            .await?;

        if removed == 0 {
            return Ok(());
        }

        unhide_related_content(self, item_id, hide_sitewide, force_all, args, registry).await
    }
}

/// Hide every item `adapter` reports as related to `item_id`.
pub async fn hide_related_content<A: SuspendAdapter + ?Sized>(
    adapter: &A,
    item_id: i64,
    hide_sitewide: Option<bool>,
    args: &SuspendArgs,
    registry: &QueryFilterRegistry,
) -> AppResult<()> {
    let child_args = args.cascaded_from(adapter.content_type(), item_id);
    for (content_type, ids) in adapter.related_contents(item_id, registry).await {
        let Some(child) = registry.suspend_adapter(content_type) else {
            continue;
        };
        debug!(
            parent_type = %adapter.content_type(),
            parent_id = item_id,
            %content_type,
            count = ids.len(),
            "Cascading hide"
        );
        for id in ids {
            child
                .manage_hidden(id, hide_sitewide, &child_args, registry)
                .await?;
        }
    }
    Ok(())
}

/// Unhide every item `adapter` reports as related to `item_id`.
pub async fn unhide_related_content<A: SuspendAdapter + ?Sized>(
    adapter: &A,
    item_id: i64,
    hide_sitewide: Option<bool>,
    force_all: bool,
    args: &SuspendArgs,
    registry: &QueryFilterRegistry,
) -> AppResult<()> {
    let child_args = args.cascaded_from(adapter.content_type(), item_id);
    for (content_type, ids) in adapter.related_contents(item_id, registry).await {
        let Some(child) = registry.suspend_adapter(content_type) else {
            continue;
        };
        debug!(
            parent_type = %adapter.content_type(),
            parent_id = item_id,
            %content_type,
            count = ids.len(),
            "Cascading unhide"
        );
        for id in ids {
            child
                .manage_unhidden(id, hide_sitewide, force_all, &child_args, registry)
                .await?;
        }
    }
    Ok(())
}

/// `LEFT JOIN hidden_record AS <alias>` matching rows of `source` for the
/// item in `column` that are sitewide or belong to the viewer.
#[must_use]
pub fn exclusion_join(
    source: HideSource,
    content_type: ContentType,
    column: ColumnPath,
    viewer_id: Option<i64>,
) -> JoinFragment {
    let alias = source.join_alias();
    let sitewide = Predicate::eq(ColumnPath::new(alias, "hide_sitewide"), true);
    let visible = match viewer_id {
        Some(viewer) => Predicate::Or(vec![
            sitewide,
            Predicate::eq(ColumnPath::new(alias, "user_id"), viewer),
        ]),
        None => sitewide,
    };

    JoinFragment::left(
        HIDDEN_RECORD_TABLE,
        alias,
        Predicate::And(vec![
            Predicate::column_eq(ColumnPath::new(alias, "item_id"), column),
            Predicate::eq(ColumnPath::new(alias, "item_type"), content_type.as_str()),
            Predicate::eq(ColumnPath::new(alias, "source"), source.to_string()),
            visible,
        ]),
    )
}
