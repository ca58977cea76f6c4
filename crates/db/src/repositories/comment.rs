//! Comment repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{Comment, comment, comment::CommentStatus},
    soft_delete::SoftDelete,
};
use chrono::Utc;
use quill_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_live()
            .filter(comment::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a live comment by ID that sits on `post_id`.
    pub async fn find_on_post(&self, id: &str, post_id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_live()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::PostId.eq(post_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Approved comments on a post, oldest first.
    pub async fn find_approved_by_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find_live()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Status.eq(CommentStatus::Approved))
            .order_by_asc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Pending comments across all posts, newest first.
    pub async fn find_pending(&self) -> AppResult<Vec<comment::Model>> {
        Comment::find_live()
            .filter(comment::Column::Status.eq(CommentStatus::Pending))
            .order_by_desc(comment::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Set the moderation status. Returns the number of rows hit.
    pub async fn set_status(&self, id: &str, status: CommentStatus) -> AppResult<u64> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let result = Comment::update_live()
            .col_expr(comment::Column::Status, Expr::value(status))
            .col_expr(comment::Column::UpdatedAt, Expr::value(now))
            .filter(comment::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Tombstone a comment. Returns the number of rows hit.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Comment::tombstone()
            .filter(comment::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }
}
