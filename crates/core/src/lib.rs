//! Moderation and suspension filtering for shroud.
//!
//! Listing code hands its query to a [`QueryFilterRegistry`], which lets the
//! adapter of each role for the listed content type append an exclusion
//! join and a composed where clause. The write side lives in [`services`].

pub mod adapter;
pub mod listing;
pub mod moderation;
pub mod modules;
pub mod query;
pub mod registry;
pub mod services;
pub mod suspend;

pub use adapter::{ContentTypeAdapter, RelatedContents, SuspendAdapter, SuspendArgs};
pub use listing::{
    ActivityFilter, ForumFilter, GroupFilter, ListQuery, Listing, ListingFilter, MemberFilter,
    ReplyFilter, TopicFilter,
};
pub use modules::ModuleAvailability;
pub use query::{IdSet, Predicate, QueryArgs, WhereConditions};
pub use registry::{ExclusionContext, ExclusionMiddleware, QueryFilterRegistry};
pub use services::{ModerationService, SuspendService};
