//! Shared fixtures for the scenario tests.

#![allow(dead_code)]

use std::sync::Arc;

use shroud_core::query::IdSet;
use shroud_core::{
    ActivityFilter, GroupFilter, ListQuery, ModerationService, ModuleAvailability, QueryArgs,
    QueryFilterRegistry, ReplyFilter, SuspendService, TopicFilter,
};
use shroud_db::entities::activity::{COMPONENT_ACTIVITY, COMPONENT_FORUMS, COMPONENT_GROUPS, TYPE_COMMENT};
use shroud_db::repositories::UserRepository;
use shroud_db::test_utils::TestDatabase;

pub const AUTHOR: i64 = 1;
pub const OTHER: i64 = 2;
pub const VIEWER: i64 = 3;

pub const GROUP: i64 = 42;
pub const FORUM: i64 = 8;
pub const TOPIC: i64 = 80;
pub const REPLY: i64 = 800;

/// Update posted by the group creator.
pub const AUTHOR_UPDATE: i64 = 100;
/// Update posted inside group 42.
pub const GROUP_UPDATE: i64 = 101;
/// Update posted inside another group.
pub const OTHER_GROUP_UPDATE: i64 = 102;
/// Forum activity for topic 80.
pub const TOPIC_ACTIVITY: i64 = 103;
/// Comment on the creator's update.
pub const COMMENT: i64 = 104;

pub struct Fixture {
    pub db: TestDatabase,
    pub registry: Arc<QueryFilterRegistry>,
    pub moderation: ModerationService,
    pub suspend: SuspendService,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_modules(ModuleAvailability::all()).await
    }

    pub async fn with_modules(modules: ModuleAvailability) -> Self {
        let db = TestDatabase::in_memory().await.unwrap();
        seed(&db).await;

        let registry = Arc::new(QueryFilterRegistry::with_defaults(db.connection(), modules));
        let users = UserRepository::new(db.connection());

        Self {
            moderation: ModerationService::new(registry.clone(), users.clone()),
            suspend: SuspendService::new(registry.clone(), users),
            registry,
            db,
        }
    }

    pub async fn group_ids(&self, args: QueryArgs) -> IdSet {
        let query = ListQuery::new(GroupFilter::default()).args(args);
        self.registry.listing().ids(&query).await.unwrap().into_iter().collect()
    }

    pub async fn activity_ids(&self, args: QueryArgs) -> IdSet {
        let query = ListQuery::new(ActivityFilter::default()).args(args);
        self.registry.listing().ids(&query).await.unwrap().into_iter().collect()
    }

    pub async fn topic_ids(&self, args: QueryArgs) -> IdSet {
        let query = ListQuery::new(TopicFilter::default()).args(args);
        self.registry.listing().ids(&query).await.unwrap().into_iter().collect()
    }

    pub async fn reply_ids(&self, args: QueryArgs) -> IdSet {
        let query = ListQuery::new(ReplyFilter::default()).args(args);
        self.registry.listing().ids(&query).await.unwrap().into_iter().collect()
    }
}

/// Members 1-3; group 42 by member 1 with forum 8, topic 80 and reply 800;
/// five activity rows.
async fn seed(db: &TestDatabase) {
    for member in [AUTHOR, OTHER, VIEWER] {
        db.seed_member(member).await.unwrap();
    }

    db.seed_forum(FORUM, Some(GROUP), AUTHOR).await.unwrap();
    db.seed_group(GROUP, AUTHOR, Some(FORUM)).await.unwrap();
    db.seed_topic(TOPIC, FORUM, OTHER).await.unwrap();
    db.seed_reply(REPLY, TOPIC, FORUM, OTHER).await.unwrap();

    db.seed_activity(AUTHOR_UPDATE, AUTHOR, COMPONENT_ACTIVITY, "activity_update", 0)
        .await
        .unwrap();
    db.seed_activity(GROUP_UPDATE, OTHER, COMPONENT_GROUPS, "activity_update", GROUP)
        .await
        .unwrap();
    db.seed_activity(OTHER_GROUP_UPDATE, OTHER, COMPONENT_GROUPS, "activity_update", 7)
        .await
        .unwrap();
    db.seed_activity(TOPIC_ACTIVITY, VIEWER, COMPONENT_FORUMS, "topic_create", TOPIC)
        .await
        .unwrap();
    db.seed_activity(COMMENT, OTHER, COMPONENT_ACTIVITY, TYPE_COMMENT, AUTHOR_UPDATE)
        .await
        .unwrap();
}
