//! Moderation filtering against an in-memory database.

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use maplit::btreeset;
use sea_orm::sea_query::PostgresQueryBuilder;
use sea_orm::{EntityTrait, QueryTrait};
use shroud_common::AppError;
use shroud_core::moderation::ActivityModeration;
use shroud_core::{
    ContentTypeAdapter, ExclusionContext, ModuleAvailability, QueryArgs, QueryFilterRegistry,
};
use shroud_db::entities::{Activity, ContentType, Group, HideSource};

#[tokio::test]
async fn test_hidden_group_hides_group_activity() {
    let fixture = Fixture::new().await;
    fixture
        .moderation
        .hide_item(ContentType::Group, GROUP)
        .await
        .unwrap();

    let registry = &fixture.registry;
    assert_eq!(
        registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Group)
            .await,
        btreeset! {GROUP}
    );
    // Group activity, plus the forum activity of the group's forum topic.
    assert_eq!(
        registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Activity)
            .await,
        btreeset! {GROUP_UPDATE, TOPIC_ACTIVITY}
    );
    assert_eq!(
        registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Reply)
            .await,
        btreeset! {REPLY}
    );

    assert!(!fixture.group_ids(QueryArgs::default()).await.contains(&GROUP));
    assert_eq!(
        fixture.activity_ids(QueryArgs::default()).await,
        btreeset! {AUTHOR_UPDATE, OTHER_GROUP_UPDATE, COMMENT}
    );
}

#[tokio::test]
async fn test_unhide_restores_listing() {
    let fixture = Fixture::new().await;
    let moderation = &fixture.moderation;

    moderation.hide_item(ContentType::Topic, TOPIC).await.unwrap();
    assert!(fixture.reply_ids(QueryArgs::default()).await.is_empty());
    assert!(fixture.topic_ids(QueryArgs::default()).await.is_empty());

    assert!(moderation.unhide_item(ContentType::Topic, TOPIC).await.unwrap());
    assert_eq!(fixture.reply_ids(QueryArgs::default()).await, btreeset! {REPLY});
    assert_eq!(fixture.topic_ids(QueryArgs::default()).await, btreeset! {TOPIC});
}

#[tokio::test]
async fn test_hide_and_unhide_are_idempotent() {
    let fixture = Fixture::new().await;
    let moderation = &fixture.moderation;

    moderation.hide_item(ContentType::Group, GROUP).await.unwrap();
    let once = fixture
        .registry
        .sitewide_hidden_ids(HideSource::Moderation, ContentType::Activity)
        .await;
    moderation.hide_item(ContentType::Group, GROUP).await.unwrap();
    let twice = fixture
        .registry
        .sitewide_hidden_ids(HideSource::Moderation, ContentType::Activity)
        .await;
    assert_eq!(once, twice);

    let rows = fixture
        .registry
        .hidden_records()
        .find_for_item(HideSource::Moderation, ContentType::Group, GROUP)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    assert!(moderation.unhide_item(ContentType::Group, GROUP).await.unwrap());
    assert!(!moderation.unhide_item(ContentType::Group, GROUP).await.unwrap());
    assert!(
        fixture
            .registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Group)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_no_hidden_groups_omits_group_clause() {
    let fixture = Fixture::new().await;
    let adapter = ActivityModeration::new(ModuleAvailability::all());
    let args = QueryArgs::default();

    assert!(
        adapter
            .exclude_group_activity_query(&fixture.registry, None)
            .await
            .is_none()
    );

    let ctx = ExclusionContext {
        registry: &fixture.registry,
        args: &args,
    };
    let clauses = adapter.where_clauses(&ctx).await;
    assert!(clauses.contains_key("activity_where"));
    assert!(!clauses.contains_key("groups_where"));
    assert!(!clauses.contains_key("members_where"));
}

#[tokio::test]
async fn test_opt_out_matches_unfiltered_statement() {
    let fixture = Fixture::new().await;
    fixture
        .moderation
        .hide_item(ContentType::Group, GROUP)
        .await
        .unwrap();
    let bare = QueryFilterRegistry::new(fixture.db.connection(), ModuleAvailability::all());

    let expected = bare
        .apply_exclusions(Activity::find(), ContentType::Activity, &QueryArgs::default())
        .await;
    let actual = fixture
        .registry
        .apply_exclusions(Activity::find(), ContentType::Activity, &QueryArgs::unmoderated())
        .await;
    assert_eq!(
        QueryTrait::as_query(&actual).to_string(PostgresQueryBuilder),
        QueryTrait::as_query(&expected).to_string(PostgresQueryBuilder)
    );

    let expected = bare
        .apply_exclusions(Group::find(), ContentType::Group, &QueryArgs::default())
        .await;
    let actual = fixture
        .registry
        .apply_exclusions(Group::find(), ContentType::Group, &QueryArgs::unmoderated())
        .await;
    assert_eq!(
        QueryTrait::as_query(&actual).to_string(PostgresQueryBuilder),
        QueryTrait::as_query(&expected).to_string(PostgresQueryBuilder)
    );

    let unfiltered = fixture.group_ids(QueryArgs::unmoderated()).await;
    assert!(unfiltered.contains(&GROUP));
}

#[tokio::test]
async fn test_block_is_personal() {
    let fixture = Fixture::new().await;
    fixture.moderation.block_member(VIEWER, OTHER).await.unwrap();

    assert_eq!(
        fixture.activity_ids(QueryArgs::for_viewer(VIEWER)).await,
        btreeset! {AUTHOR_UPDATE, TOPIC_ACTIVITY}
    );
    assert!(fixture.reply_ids(QueryArgs::for_viewer(VIEWER)).await.is_empty());
    assert_eq!(
        fixture.activity_ids(QueryArgs::for_viewer(AUTHOR)).await.len(),
        5
    );
    assert_eq!(fixture.activity_ids(QueryArgs::default()).await.len(), 5);

    assert!(
        fixture
            .moderation
            .is_hidden(ContentType::Member, OTHER, Some(VIEWER))
            .await
    );
    assert!(
        !fixture
            .moderation
            .is_hidden(ContentType::Member, OTHER, None)
            .await
    );

    assert!(fixture.moderation.unblock_member(VIEWER, OTHER).await.unwrap());
    assert_eq!(
        fixture.activity_ids(QueryArgs::for_viewer(VIEWER)).await.len(),
        5
    );
}

#[tokio::test]
async fn test_block_unknown_member() {
    let fixture = Fixture::new().await;
    let result = fixture.moderation.block_member(VIEWER, 99).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_inactive_groups_module_skips_group_clause() {
    let modules = ModuleAvailability {
        groups: false,
        ..ModuleAvailability::all()
    };
    let fixture = Fixture::with_modules(modules).await;

    let result = fixture.moderation.hide_item(ContentType::Group, GROUP).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    // A record written by another installation is ignored.
    fixture
        .registry
        .hidden_records()
        .add(shroud_db::repositories::NewHiddenRecord {
            source: HideSource::Moderation,
            item_type: ContentType::Group,
            item_id: GROUP,
            user_id: None,
            hide_sitewide: Some(true),
            parent: None,
        })
        .await
        .unwrap();

    assert!(
        fixture
            .registry
            .sitewide_hidden_ids(HideSource::Moderation, ContentType::Group)
            .await
            .is_empty()
    );
    assert!(fixture.activity_ids(QueryArgs::default()).await.contains(&GROUP_UPDATE));
}
