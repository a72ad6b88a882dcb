//! Hidden record parent entity (why a cascaded hide exists).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::hidden_record::ContentType;

/// One parent item whose hide cascaded into a hidden record.
///
/// A cascaded record stays while at least one parent link remains.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hidden_record_parent")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub record_id: String,

    pub parent_type: ContentType,

    pub parent_id: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hidden_record::Entity",
        from = "Column::RecordId",
        to = "super::hidden_record::Column::Id",
        on_delete = "Cascade"
    )]
    HiddenRecord,
}

impl Related<super::hidden_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HiddenRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
