//! Moderation role: hides reported or blocked items and everything that
//! belongs to them, computed when a listing is filtered.

mod activity;
mod forum;
mod group;
mod member;

pub use activity::ActivityModeration;
pub use forum::{ForumModeration, ReplyModeration, TopicModeration};
pub use group::GroupModeration;
pub use member::MemberModeration;
