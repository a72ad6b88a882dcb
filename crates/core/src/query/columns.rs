//! Columns of the content tables that exclusion clauses refer to.

use shroud_db::entities::ContentType;

use super::ColumnPath;

pub const ACTIVITY_ID: ColumnPath = ColumnPath::new("activity", "id");
pub const ACTIVITY_USER_ID: ColumnPath = ColumnPath::new("activity", "user_id");
pub const ACTIVITY_COMPONENT: ColumnPath = ColumnPath::new("activity", "component");
pub const ACTIVITY_TYPE: ColumnPath = ColumnPath::new("activity", "type");
pub const ACTIVITY_ITEM_ID: ColumnPath = ColumnPath::new("activity", "item_id");
pub const ACTIVITY_HIDE_SITEWIDE: ColumnPath = ColumnPath::new("activity", "hide_sitewide");

pub const GROUP_ID: ColumnPath = ColumnPath::new("groups", "id");
pub const GROUP_CREATOR_ID: ColumnPath = ColumnPath::new("groups", "creator_id");
pub const GROUP_STATUS: ColumnPath = ColumnPath::new("groups", "status");

pub const FORUM_ID: ColumnPath = ColumnPath::new("forum", "id");
pub const FORUM_GROUP_ID: ColumnPath = ColumnPath::new("forum", "group_id");
pub const FORUM_AUTHOR_ID: ColumnPath = ColumnPath::new("forum", "author_id");

pub const TOPIC_ID: ColumnPath = ColumnPath::new("forum_topic", "id");
pub const TOPIC_FORUM_ID: ColumnPath = ColumnPath::new("forum_topic", "forum_id");
pub const TOPIC_AUTHOR_ID: ColumnPath = ColumnPath::new("forum_topic", "author_id");

pub const REPLY_ID: ColumnPath = ColumnPath::new("forum_reply", "id");
pub const REPLY_TOPIC_ID: ColumnPath = ColumnPath::new("forum_reply", "topic_id");
pub const REPLY_AUTHOR_ID: ColumnPath = ColumnPath::new("forum_reply", "author_id");

pub const MEMBER_ID: ColumnPath = ColumnPath::new("user", "id");

/// Primary key of the table listing items of `content_type`.
#[must_use]
pub const fn primary_key(content_type: ContentType) -> ColumnPath {
    match content_type {
        ContentType::Activity => ACTIVITY_ID,
        ContentType::Group => GROUP_ID,
        ContentType::Forum => FORUM_ID,
        ContentType::Topic => TOPIC_ID,
        ContentType::Reply => REPLY_ID,
        ContentType::Member => MEMBER_ID,
    }
}
