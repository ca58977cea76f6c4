//! Reading list repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{ReadingList, reading_list},
    soft_delete::SoftDelete,
};
use quill_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Reading list repository for database operations.
#[derive(Clone)]
pub struct ReadingListRepository {
    db: Arc<DatabaseConnection>,
}

impl ReadingListRepository {
    /// Create a new reading list repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the live entry for a user and post.
    pub async fn find(
        &self,
        user_key: &str,
        post_id: &str,
    ) -> AppResult<Option<reading_list::Model>> {
        ReadingList::find_live()
            .filter(reading_list::Column::UserKey.eq(user_key))
            .filter(reading_list::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create an entry.
    pub async fn create(&self, model: reading_list::ActiveModel) -> AppResult<reading_list::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Tombstone the live entry. Returns the number of rows hit.
    pub async fn delete(&self, user_key: &str, post_id: &str) -> AppResult<u64> {
        let result = ReadingList::tombstone()
            .filter(reading_list::Column::UserKey.eq(user_key))
            .filter(reading_list::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// A user's live entries, newest first.
    pub async fn find_by_user(&self, user_key: &str) -> AppResult<Vec<reading_list::Model>> {
        ReadingList::find_live()
            .filter(reading_list::Column::UserKey.eq(user_key))
            .order_by_desc(reading_list::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}
