//! Follow repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{Follow, follow},
    soft_delete::SoftDelete,
};
use quill_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Open a transaction for a follow or unfollow.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db.begin().await.map_err(db_error)
    }

    /// Find the live edge `follower_key -> followee_key` on `conn`.
    pub async fn find_live<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_key: &str,
        followee_key: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find_live()
            .filter(follow::Column::FollowerKey.eq(follower_key))
            .filter(follow::Column::FolloweeKey.eq(followee_key))
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Check if `follower_key` follows `followee_key`.
    pub async fn is_following(&self, follower_key: &str, followee_key: &str) -> AppResult<bool> {
        Ok(self
            .find_live(self.db.as_ref(), follower_key, followee_key)
            .await?
            .is_some())
    }

    /// Insert an edge on `conn`.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: follow::ActiveModel,
    ) -> AppResult<follow::Model> {
        model.insert(conn).await.map_err(db_error)
    }

    /// Tombstone the live edge on `conn`. Returns the number of rows hit.
    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        follower_key: &str,
        followee_key: &str,
    ) -> AppResult<u64> {
        let result = Follow::tombstone()
            .filter(follow::Column::FollowerKey.eq(follower_key))
            .filter(follow::Column::FolloweeKey.eq(followee_key))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Count live followers of a user.
    pub async fn count_followers(&self, followee_key: &str) -> AppResult<u64> {
        Follow::find_live()
            .filter(follow::Column::FolloweeKey.eq(followee_key))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}
