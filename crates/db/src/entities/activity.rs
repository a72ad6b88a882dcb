//! Activity entity (activity stream items).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Component of an update posted directly to the activity stream.
pub const COMPONENT_ACTIVITY: &str = "activity";
/// Component of activity posted inside a group; `item_id` is the group ID.
pub const COMPONENT_GROUPS: &str = "groups";
/// Component of activity generated by the forums; `item_id` is the forum,
/// topic or reply ID.
pub const COMPONENT_FORUMS: &str = "forums";

/// Activity type of a comment; `item_id` is the commented activity ID.
pub const TYPE_COMMENT: &str = "activity_comment";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Member who performed the activity.
    #[sea_orm(indexed)]
    pub user_id: i64,

    /// Owning component (`activity`, `groups`, `forums`).
    pub component: String,

    /// Activity type (`activity_update`, `activity_comment`, ...).
    #[sea_orm(column_name = "type")]
    pub activity_type: String,

    /// Primary item the activity belongs to, interpreted per component.
    pub item_id: i64,

    #[sea_orm(nullable)]
    pub secondary_item_id: Option<i64>,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Hidden from public streams (e.g. activity of a private group).
    #[sea_orm(default_value = false)]
    pub hide_sitewide: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
