//! Database repositories.

pub mod activity;
pub mod forum;
pub mod group;
pub mod hidden_record;
pub mod user;

pub use activity::ActivityRepository;
pub use forum::ForumRepository;
pub use group::GroupRepository;
pub use hidden_record::{HiddenRecordRemoval, HiddenRecordRepository, NewHiddenRecord};
pub use user::UserRepository;
