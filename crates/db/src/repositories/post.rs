//! Post repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{Post, post, post::PostStatus},
    soft_delete::SoftDelete,
};
use quill_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

/// Live aggregates over one author's posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromQueryResult)]
pub struct AuthorTotals {
    pub post_count: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a live post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_live()
            .filter(post::Column::Id.eq(id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a live post by ID, returning an error if absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))
    }

    /// Find a live post by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<post::Model>> {
        Post::find_live()
            .filter(post::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a live post by ID that belongs to `author_key`.
    pub async fn find_owned(&self, id: &str, author_key: &str) -> AppResult<Option<post::Model>> {
        Post::find_live()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorKey.eq(author_key))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Whether a live post other than `exclude_id` already uses `slug`.
    pub async fn slug_taken(&self, slug: &str, exclude_id: Option<&str>) -> AppResult<bool> {
        let mut query = Post::find_live().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(post::Column::Id.ne(id));
        }

        Ok(query
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?
            .is_some())
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Tombstone a post owned by `author_key`. Returns the number of rows hit.
    pub async fn delete_owned(&self, id: &str, author_key: &str) -> AppResult<u64> {
        let result = Post::tombstone()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorKey.eq(author_key))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// List live posts, newest first.
    pub async fn list(
        &self,
        status: Option<PostStatus>,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        let mut query = Post::find_live().order_by_desc(post::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(status));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Count live posts, optionally by status.
    pub async fn count(&self, status: Option<PostStatus>) -> AppResult<u64> {
        let mut query = Post::find_live();
        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(status));
        }

        query.count(self.db.as_ref()).await.map_err(db_error)
    }

    /// An author's draft and published posts, most recently updated first.
    pub async fn find_drafts(&self, author_key: &str) -> AppResult<Vec<post::Model>> {
        Post::find_live()
            .filter(post::Column::AuthorKey.eq(author_key))
            .filter(post::Column::Status.is_in([PostStatus::Draft, PostStatus::Published]))
            .order_by_desc(post::Column::UpdatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Live published posts among `ids`, in no particular order.
    pub async fn find_published_by_ids(&self, ids: &[String]) -> AppResult<Vec<post::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Post::find_live()
            .filter(post::Column::Id.is_in(ids.iter().cloned()))
            .filter(post::Column::Status.eq(PostStatus::Published))
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Add one to `share_count`. Returns the number of rows hit.
    pub async fn increment_share_count(&self, id: &str) -> AppResult<u64> {
        let result = Post::update_live()
            .col_expr(
                post::Column::ShareCount,
                Expr::col(post::Column::ShareCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Add `n` to `view_count`.
    pub async fn add_views(&self, id: &str, n: i32) -> AppResult<()> {
        Post::update_live()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(n),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Add one to `like_count` on `conn`.
    pub async fn increment_like_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<u64> {
        let result = Post::update_live()
            .col_expr(
                post::Column::LikeCount,
                Expr::col(post::Column::LikeCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Subtract one from `like_count` on `conn`, never going below zero.
    pub async fn decrement_like_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<u64> {
        let result = Post::update_live()
            .col_expr(
                post::Column::LikeCount,
                Expr::cust("GREATEST(like_count - 1, 0)"),
            )
            .filter(post::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    /// Count, view sum and like sum over an author's live posts.
    pub async fn author_totals(&self, author_key: &str) -> AppResult<AuthorTotals> {
        let totals = Post::find_live()
            .select_only()
            .column_as(Expr::cust("COUNT(*)"), "post_count")
            .column_as(Expr::cust("COALESCE(SUM(view_count), 0)"), "total_views")
            .column_as(Expr::cust("COALESCE(SUM(like_count), 0)"), "total_likes")
            .filter(post::Column::AuthorKey.eq(author_key))
            .into_model::<AuthorTotals>()
            .one(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(totals.unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    fn create_test_post(id: &str, slug: &str, author_key: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            title: "Hello World".to_string(),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            slug: slug.to_string(),
            author_key: author_key.to_string(),
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
            status: PostStatus::Draft,
            tags: serde_json::json!([]),
            meta_title: None,
            meta_description: None,
            featured_image: None,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            published_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_slug_found() {
        let post = create_test_post("p1", "hello-world", "user_a");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_slug("hello-world").await.unwrap();

        assert_eq!(result.unwrap().id, "p1");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_slug_taken() {
        let post = create_test_post("p1", "hello-world", "user_a");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        assert!(repo.slug_taken("hello-world", None).await.unwrap());
        assert!(!repo.slug_taken("hello-world", Some("p1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_live_queries_exclude_tombstones() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(Arc::clone(&db));
        repo.find_by_id("p1").await.unwrap();

        drop(repo);
        let db = Arc::try_unwrap(db).ok().unwrap();
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("deleted_at"));
        assert!(sql.contains("IS NULL"));
    }

    #[tokio::test]
    async fn test_delete_owned_reports_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let rows = repo.delete_owned("p1", "someone_else").await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_decrement_like_count_is_floored() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = PostRepository::new(Arc::clone(&db));
        repo.decrement_like_count(db.as_ref(), "p1").await.unwrap();

        drop(repo);
        let db = Arc::try_unwrap(db).ok().unwrap();
        let sql = format!("{:?}", db.into_transaction_log());
        assert!(sql.contains("GREATEST(like_count - 1, 0)"));
    }

    #[tokio::test]
    async fn test_author_totals() {
        let row = BTreeMap::from([
            ("post_count", Value::BigInt(Some(3))),
            ("total_views", Value::BigInt(Some(120))),
            ("total_likes", Value::BigInt(Some(7))),
        ]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let totals = repo.author_totals("user_a").await.unwrap();

        assert_eq!(
            totals,
            AuthorTotals {
                post_count: 3,
                total_views: 120,
                total_likes: 7,
            }
        );
    }

    #[tokio::test]
    async fn test_find_published_by_ids_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = PostRepository::new(db);
        let result = repo.find_published_by_ids(&[]).await.unwrap();

        assert!(result.is_empty());
    }
}
