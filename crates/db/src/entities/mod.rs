//! Database entities.

#![allow(missing_docs)]

pub mod activity;
pub mod forum;
pub mod forum_reply;
pub mod forum_topic;
pub mod group;
pub mod hidden_record;
pub mod hidden_record_parent;
pub mod user;

pub use activity::Entity as Activity;
pub use forum::Entity as Forum;
pub use forum_reply::Entity as ForumReply;
pub use forum_topic::Entity as ForumTopic;
pub use group::Entity as Group;
pub use hidden_record::{ContentType, Entity as HiddenRecord, HideSource};
pub use hidden_record_parent::Entity as HiddenRecordParent;
pub use user::Entity as User;
