//! Post entity (blog posts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::soft_delete::SoftDelete;

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    /// Reserved; nothing transitions here yet.
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl PostStatus {
    /// Parse a status filter value (`draft`, `published`, `archived`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "published" => Some(Self::Published),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub excerpt: String,

    /// URL-safe identifier, unique among live posts
    #[sea_orm(indexed)]
    pub slug: String,

    /// Identity key of the owning author
    #[sea_orm(indexed)]
    pub author_key: String,

    pub author_name: String,

    pub author_email: String,

    pub status: PostStatus,

    /// Tag list (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    #[sea_orm(nullable)]
    pub meta_title: Option<String>,

    #[sea_orm(nullable)]
    pub meta_description: Option<String>,

    #[sea_orm(nullable)]
    pub featured_image: Option<String>,

    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Mirrors the number of live `post_like` rows
    #[sea_orm(default_value = 0)]
    pub like_count: i32,

    #[sea_orm(default_value = 0)]
    pub share_count: i32,

    /// Set the first time the post enters `published`
    #[sea_orm(nullable)]
    pub published_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,

    #[sea_orm(has_many = "super::post_like::Entity")]
    Like,

    #[sea_orm(has_many = "super::reading_list::Entity")]
    ReadingList,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::post_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

impl Related<super::reading_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReadingList.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}
