//! Like repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{PostLike, post_like},
    soft_delete::SoftDelete,
};
use quill_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct PostLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl PostLikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Open a transaction for a toggle.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db.begin().await.map_err(db_error)
    }

    /// Find the live like for a post and actor on `conn`.
    pub async fn find_live<C: ConnectionTrait>(
        &self,
        conn: &C,
        post_id: &str,
        actor_key: &str,
    ) -> AppResult<Option<post_like::Model>> {
        PostLike::find_live()
            .filter(post_like::Column::PostId.eq(post_id))
            .filter(post_like::Column::ActorKey.eq(actor_key))
            .one(conn)
            .await
            .map_err(db_error)
    }

    /// Whether `actor_key` currently likes `post_id`.
    pub async fn has_liked(&self, post_id: &str, actor_key: &str) -> AppResult<bool> {
        Ok(self
            .find_live(self.db.as_ref(), post_id, actor_key)
            .await?
            .is_some())
    }

    /// Insert a like on `conn`.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: post_like::ActiveModel,
    ) -> AppResult<post_like::Model> {
        model.insert(conn).await.map_err(db_error)
    }

    /// Tombstone a like by ID on `conn`.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<u64> {
        let result = PostLike::tombstone()
            .filter(post_like::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Count live likes on a post.
    pub async fn count_by_post(&self, post_id: &str) -> AppResult<u64> {
        PostLike::find_live()
            .filter(post_like::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(db_error)
    }
}
