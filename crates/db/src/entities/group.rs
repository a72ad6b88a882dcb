//! Group entity for user communities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group visibility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum GroupStatus {
    /// Listed and readable by everyone.
    #[sea_orm(string_value = "public")]
    Public,
    /// Listed, content restricted to members.
    #[sea_orm(string_value = "private")]
    Private,
    /// Not listed unless `show_hidden` is requested.
    #[sea_orm(string_value = "hidden")]
    Hidden,
}

impl Default for GroupStatus {
    fn default() -> Self {
        Self::Public
    }
}

/// Group entity - a community with its own activity and optional forum.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Member who created the group.
    #[sea_orm(indexed)]
    pub creator_id: i64,

    /// Group name.
    pub name: String,

    pub status: GroupStatus,

    /// Forum attached to the group, if the group has one.
    #[sea_orm(nullable)]
    pub forum_id: Option<i64>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
