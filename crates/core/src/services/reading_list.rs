//! Reading list service.

use std::collections::HashMap;

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{
    entities::{post, reading_list},
    repositories::{PostRepository, ReadingListRepository},
};
use sea_orm::Set;

/// Reading list service for business logic.
#[derive(Clone)]
pub struct ReadingListService {
    reading_list_repo: ReadingListRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl ReadingListService {
    /// Create a new reading list service.
    #[must_use]
    pub const fn new(reading_list_repo: ReadingListRepository, post_repo: PostRepository) -> Self {
        Self {
            reading_list_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Save a post. Returns `false` when it was already saved.
    pub async fn add(&self, user_key: &str, post_id: &str) -> AppResult<bool> {
        self.post_repo.get_by_id(post_id).await?;

        if self.reading_list_repo.find(user_key, post_id).await?.is_some() {
            return Ok(false);
        }

        let model = reading_list::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_key: Set(user_key.to_string()),
            post_id: Set(post_id.to_string()),
            created_at: Set(Utc::now().into()),
            deleted_at: Set(None),
        };

        match self.reading_list_repo.create(model).await {
            Ok(_) => Ok(true),
            Err(AppError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a saved post. Returns `false` when it was not saved.
    pub async fn remove(&self, user_key: &str, post_id: &str) -> AppResult<bool> {
        Ok(self.reading_list_repo.delete(user_key, post_id).await? > 0)
    }

    /// Saved published posts, most recently saved first.
    pub async fn list(&self, user_key: &str) -> AppResult<Vec<post::Model>> {
        let entries = self.reading_list_repo.find_by_user(user_key).await?;
        let ids: Vec<String> = entries.iter().map(|e| e.post_id.clone()).collect();

        let mut posts: HashMap<String, post::Model> = self
            .post_repo
            .find_published_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(ids.iter().filter_map(|id| posts.remove(id)).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quill_db::entities::post::PostStatus;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            title: format!("Post {id}"),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            slug: id.to_string(),
            author_key: "author".to_string(),
            author_name: "Ada".to_string(),
            author_email: String::new(),
            status: PostStatus::Published,
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

    fn create_test_entry(id: &str, post_id: &str) -> reading_list::Model {
        reading_list::Model {
            id: id.to_string(),
            user_key: "user_a".to_string(),
            post_id: post_id.to_string(),
            created_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> ReadingListService {
        ReadingListService::new(
            ReadingListRepository::new(Arc::clone(db)),
            PostRepository::new(Arc::clone(db)),
        )
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1")]])
                .append_query_results([[create_test_entry("r1", "p1")]])
                .into_connection(),
        );

        let added = service(&db).add("user_a", "p1").await.unwrap();
        assert!(!added);
    }

    #[tokio::test]
    async fn test_add_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(&db).add("user_a", "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_keeps_entry_order_and_skips_unpublished() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_entry("r3", "p3"),
                    create_test_entry("r2", "draft"),
                    create_test_entry("r1", "p1"),
                ]])
                .append_query_results([[create_test_post("p1"), create_test_post("p3")]])
                .into_connection(),
        );

        let posts = service(&db).list("user_a").await.unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["p3", "p1"]);
    }
}
