//! Hidden record entity (one row per hide action on an item).

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use shroud_common::AppError;

/// Content types that can be hidden and filtered out of listings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    #[sea_orm(string_value = "activity")]
    Activity,
    #[sea_orm(string_value = "groups")]
    Group,
    #[sea_orm(string_value = "forum")]
    Forum,
    #[sea_orm(string_value = "topic")]
    Topic,
    #[sea_orm(string_value = "reply")]
    Reply,
    #[sea_orm(string_value = "user")]
    Member,
}

impl ContentType {
    /// Every content type, leaves (members) last.
    pub const ALL: [Self; 6] = [
        Self::Activity,
        Self::Group,
        Self::Forum,
        Self::Topic,
        Self::Reply,
        Self::Member,
    ];

    /// The stored name of this content type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Group => "groups",
            Self::Forum => "forum",
            Self::Topic => "topic",
            Self::Reply => "reply",
            Self::Member => "user",
        }
    }

    /// Key of the where sub-clause that excludes items hidden because an
    /// item of this type is hidden.
    #[must_use]
    pub const fn where_key(self) -> &'static str {
        match self {
            Self::Activity => "activity_where",
            Self::Group => "groups_where",
            Self::Forum => "forums_where",
            Self::Topic => "topics_where",
            Self::Reply => "replies_where",
            Self::Member => "members_where",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activity" => Ok(Self::Activity),
            "groups" | "group" => Ok(Self::Group),
            "forum" | "forums" => Ok(Self::Forum),
            "topic" => Ok(Self::Topic),
            "reply" => Ok(Self::Reply),
            "user" | "member" | "members" => Ok(Self::Member),
            other => Err(AppError::UnknownContentType(other.to_string())),
        }
    }
}

/// Which role recorded the hide.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum HideSource {
    /// Reported or blocked content.
    #[sea_orm(string_value = "moderation")]
    Moderation,
    /// Suspended accounts and everything cascaded from them.
    #[sea_orm(string_value = "suspend")]
    Suspend,
}

impl HideSource {
    /// Alias under which this source's rows are joined into listing queries.
    #[must_use]
    pub const fn join_alias(self) -> &'static str {
        match self {
            Self::Moderation => "mo",
            Self::Suspend => "s",
        }
    }

    /// Key under which this source's composed clause is merged into the
    /// listing's where conditions.
    #[must_use]
    pub const fn where_key(self) -> &'static str {
        match self {
            Self::Moderation => "moderation_where",
            Self::Suspend => "suspend_where",
        }
    }
}

impl fmt::Display for HideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Moderation => "moderation",
            Self::Suspend => "suspend",
        })
    }
}

impl FromStr for HideSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "moderation" => Ok(Self::Moderation),
            "suspend" => Ok(Self::Suspend),
            other => Err(AppError::BadRequest(format!("Unknown hide source: {other}"))),
        }
    }
}

/// Hidden record model.
///
/// A row with `hide_sitewide = true` hides the item for every viewer;
/// otherwise it hides the item only for `user_id`. Admin rows (no `user_id`)
/// are always sitewide.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hidden_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub source: HideSource,

    pub item_type: ContentType,

    #[sea_orm(indexed)]
    pub item_id: i64,

    /// Viewer who triggered a personal hide.
    #[sea_orm(nullable)]
    pub user_id: Option<i64>,

    pub hide_sitewide: bool,

    /// Set when the row has no direct hide and exists only through its
    /// parent links.
    #[sea_orm(default_value = false)]
    pub hide_parent: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hidden_record_parent::Entity")]
    Parents,
}

impl Related<super::hidden_record_parent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trips_through_str() {
        for content_type in ContentType::ALL {
            assert_eq!(
                content_type.as_str().parse::<ContentType>().unwrap(),
                content_type
            );
        }
    }

    #[test]
    fn test_content_type_aliases() {
        assert_eq!("group".parse::<ContentType>().unwrap(), ContentType::Group);
        assert_eq!("member".parse::<ContentType>().unwrap(), ContentType::Member);
        assert!(matches!(
            "note".parse::<ContentType>(),
            Err(AppError::UnknownContentType(name)) if name == "note"
        ));
    }

    #[test]
    fn test_join_aliases_differ() {
        assert_ne!(
            HideSource::Moderation.join_alias(),
            HideSource::Suspend.join_alias()
        );
        assert_eq!(HideSource::Suspend.where_key(), "suspend_where");
    }
}
