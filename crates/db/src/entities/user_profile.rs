//! User profile entity (author details and cached counters).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::soft_delete::SoftDelete;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Identity key issued by the identity provider
    #[sea_orm(unique)]
    pub user_key: String,

    pub display_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    #[sea_orm(nullable)]
    pub website: Option<String>,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    #[sea_orm(nullable)]
    pub twitter_handle: Option<String>,

    #[sea_orm(nullable)]
    pub linkedin_profile: Option<String>,

    /// Interests (JSON array of strings)
    #[sea_orm(column_type = "JsonBinary")]
    pub interests: Json,

    #[sea_orm(default_value = 0)]
    pub follower_count: i32,

    #[sea_orm(default_value = 0)]
    pub following_count: i32,

    /// Snapshot written by the stats aggregator
    #[sea_orm(default_value = 0)]
    pub post_count: i64,

    #[sea_orm(default_value = 0)]
    pub total_views: i64,

    #[sea_orm(default_value = 0)]
    pub total_likes: i64,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    pub joined_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_active_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}
