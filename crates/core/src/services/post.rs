//! Post lifecycle service.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator, PageRequest};
use quill_db::{
    entities::post::{self, PostStatus},
    repositories::PostRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

use crate::services::{
    activity::{ACTIVITY_POST, ActivityService},
    auth::Identity,
    slug::SlugAllocator,
    views::ViewCounter,
};

/// Longest excerpt, in characters, before the ellipsis.
pub const EXCERPT_LEN: usize = 200;

/// Insert attempts before a slug race is surfaced as a conflict.
const MAX_SLUG_ATTEMPTS: usize = 5;

/// Input for creating or updating a post.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// `draft` or `published`; drafts when omitted.
    pub status: Option<PostStatus>,

    #[validate(length(max = 200))]
    pub meta_title: Option<String>,

    #[validate(length(max = 500))]
    pub meta_description: Option<String>,

    #[validate(url)]
    pub featured_image: Option<String>,
}

impl PostInput {
    fn requested_status(&self) -> AppResult<PostStatus> {
        match self.status.unwrap_or(PostStatus::Draft) {
            PostStatus::Archived => Err(AppError::Validation(
                "status must be draft or published".to_string(),
            )),
            status => Ok(status),
        }
    }
}

/// Description if present, else content; cut to [`EXCERPT_LEN`] characters.
#[must_use]
pub fn excerpt(description: Option<&str>, content: &str) -> String {
    let source = description.filter(|d| !d.trim().is_empty()).unwrap_or(content);

    if source.chars().count() > EXCERPT_LEN {
        let mut cut: String = source.chars().take(EXCERPT_LEN).collect();
        cut.push_str("...");
        cut
    } else {
        source.to_string()
    }
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    slugs: SlugAllocator,
    views: ViewCounter,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository, views: ViewCounter, activity: ActivityService) -> Self {
        Self {
            slugs: SlugAllocator::new(post_repo.clone()),
            post_repo,
            views,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post with the status the input asks for.
    ///
    /// A slug taken between the probe and the insert is retried with the
    /// next free suffix a bounded number of times.
    pub async fn create(&self, input: PostInput, author: &Identity) -> AppResult<post::Model> {
        input.validate()?;
        let status = input.requested_status()?;

        let mut attempt = 0;
        let created = loop {
            attempt += 1;
            let slug = self.slugs.allocate(&input.title, None).await?;
            let model = self.new_model(&input, status, slug.clone(), author);

            match self.post_repo.create(model).await {
                Ok(post) => break post,
                Err(AppError::Conflict(_)) if attempt < MAX_SLUG_ATTEMPTS => {
                    debug!(slug = %slug, attempt, "Slug taken concurrently, reallocating");
                }
                Err(e) => return Err(e),
            }
        };

        info!(post_id = %created.id, slug = %created.slug, status = ?created.status, "Post created");

        self.activity
            .log(
                &author.subject,
                ACTIVITY_POST,
                "post",
                &created.id,
                Some(json!({ "title": created.title, "status": created.status })),
            )
            .await;

        Ok(created)
    }

    /// Create a post forced into `published`.
    pub async fn publish(&self, mut input: PostInput, author: &Identity) -> AppResult<post::Model> {
        input.status = Some(PostStatus::Published);
        self.create(input, author).await
    }

    /// Replace an owned post's fields.
    ///
    /// Absent and not-owned posts are indistinguishable to the caller.
    pub async fn update(
        &self,
        id: &str,
        input: PostInput,
        author_key: &str,
    ) -> AppResult<post::Model> {
        input.validate()?;
        let status = input.requested_status()?;

        let existing = self
            .post_repo
            .find_owned(id, author_key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))?;

        let now = Utc::now();
        let mut active: post::ActiveModel = existing.clone().into();

        if input.title != existing.title {
            let slug = self.slugs.allocate(&input.title, Some(id)).await?;
            active.slug = Set(slug);
        }
        if status == PostStatus::Published && existing.published_at.is_none() {
            active.published_at = Set(Some(now.into()));
        }

        active.excerpt = Set(excerpt(input.description.as_deref(), &input.content));
        active.title = Set(input.title);
        active.content = Set(input.content);
        active.tags = Set(json!(input.tags));
        active.status = Set(status);
        active.meta_title = Set(input.meta_title);
        active.meta_description = Set(input.meta_description);
        active.featured_image = Set(input.featured_image);
        active.updated_at = Set(now.into());

        let updated = self.post_repo.update(active).await?;
        info!(post_id = %updated.id, "Post updated");
        Ok(updated)
    }

    /// Tombstone an owned post.
    pub async fn delete(&self, id: &str, author_key: &str) -> AppResult<()> {
        if self.post_repo.delete_owned(id, author_key).await? == 0 {
            return Err(AppError::NotFound(format!("Post not found: {id}")));
        }

        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Get a post by ID, scheduling a view.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(id).await?;
        self.views.record(&post.id);
        Ok(post)
    }

    /// Get a post by slug, scheduling a view.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<post::Model> {
        let post = self
            .post_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {slug}")))?;
        self.views.record(&post.id);
        Ok(post)
    }

    /// One page of live posts, newest first, with the total row count.
    pub async fn list(
        &self,
        page: PageRequest,
        status: Option<PostStatus>,
    ) -> AppResult<(Vec<post::Model>, u64)> {
        let posts = self
            .post_repo
            .list(status, page.offset(), page.limit())
            .await?;
        let total = self.post_repo.count(status).await?;
        Ok((posts, total))
    }

    /// The author's drafts and published posts.
    pub async fn list_drafts(&self, author_key: &str) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_drafts(author_key).await
    }

    /// Bump the share counter.
    pub async fn share(&self, id: &str) -> AppResult<()> {
        if self.post_repo.increment_share_count(id).await? == 0 {
            return Err(AppError::NotFound(format!("Post not found: {id}")));
        }
        Ok(())
    }

    fn new_model(
        &self,
        input: &PostInput,
        status: PostStatus,
        slug: String,
        author: &Identity,
    ) -> post::ActiveModel {
        let now = Utc::now();
        let published_at = (status == PostStatus::Published).then(|| now.into());

        post::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title.clone()),
            content: Set(input.content.clone()),
            excerpt: Set(excerpt(input.description.as_deref(), &input.content)),
            slug: Set(slug),
            author_key: Set(author.subject.clone()),
            author_name: Set(author.name.clone()),
            author_email: Set(author.email.clone()),
            status: Set(status),
            tags: Set(json!(input.tags)),
            meta_title: Set(input.meta_title.clone()),
            meta_description: Set(input.meta_description.clone()),
            featured_image: Set(input.featured_image.clone()),
            view_count: Set(0),
            like_count: Set(0),
            share_count: Set(0),
            published_at: Set(published_at),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            deleted_at: Set(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{transaction_log, transaction_log_text};
    use crate::services::views::ViewCountService;
    use quill_db::{entities::activity, repositories::ActivityRepository};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn author() -> Identity {
        Identity {
            subject: "user_a".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn input(title: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            content: "Body".to_string(),
            ..PostInput::default()
        }
    }

    fn create_test_post(id: &str, slug: &str, status: PostStatus) -> post::Model {
        post::Model {
            id: id.to_string(),
            title: "Hello World".to_string(),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            slug: slug.to_string(),
            author_key: "user_a".to_string(),
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
            status,
            tags: json!([]),
            meta_title: None,
            meta_description: None,
            featured_image: None,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            published_at: (status == PostStatus::Published).then(|| Utc::now().into()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn activity_row() -> activity::Model {
        activity::Model {
            id: "act1".to_string(),
            user_key: "user_a".to_string(),
            activity_type: ACTIVITY_POST.to_string(),
            entity_type: "post".to_string(),
            entity_id: "p1".to_string(),
            metadata: None,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: &Arc<DatabaseConnection>, views: &ViewCountService) -> PostService {
        PostService::new(
            PostRepository::new(Arc::clone(db)),
            views.counter(),
            ActivityService::new(ActivityRepository::new(Arc::clone(db))),
        )
    }

    #[test]
    fn test_excerpt_prefers_description() {
        assert_eq!(excerpt(Some("Short"), "Long body"), "Short");
        assert_eq!(excerpt(Some("  "), "Long body"), "Long body");
        assert_eq!(excerpt(None, "Long body"), "Long body");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let content = "é".repeat(EXCERPT_LEN + 10);
        let cut = excerpt(None, &content);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), EXCERPT_LEN + 3);

        let exact = "a".repeat(EXCERPT_LEN);
        assert_eq!(excerpt(None, &exact), exact);
    }

    #[test]
    fn test_archived_status_rejected() {
        let mut input = input("Title");
        input.status = Some(PostStatus::Archived);
        assert!(matches!(
            input.requested_status(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_validation_never_touches_store() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let views = ViewCountService::new(8);

        let result = service(&db, &views).create(input(""), &author()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(transaction_log(db).is_empty());
    }

    #[tokio::test]
    async fn test_publish_sets_status_and_timestamp() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .append_query_results([[create_test_post(
                    "p1",
                    "hello-world",
                    PostStatus::Published,
                )]])
                .append_query_results([[activity_row()]])
                .into_connection(),
        );
        let views = ViewCountService::new(8);

        let post = service(&db, &views)
            .publish(input("Hello World"), &author())
            .await
            .unwrap();

        assert_eq!(post.status, PostStatus::Published);
        assert!(post.published_at.is_some());

        let log = transaction_log_text(db);
        assert!(log.contains("INSERT INTO"));
        assert!(log.contains("published"));
    }

    #[tokio::test]
    async fn test_update_not_owned_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let views = ViewCountService::new(8);

        let result = service(&db, &views)
            .update("p1", input("New"), "user_b")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_same_title_keeps_slug() {
        let existing = create_test_post("p1", "hello-world", PostStatus::Draft);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing.clone()]])
                .append_query_results([[existing]])
                .into_connection(),
        );
        let views = ViewCountService::new(8);

        let post = service(&db, &views)
            .update("p1", input("Hello World"), "user_a")
            .await
            .unwrap();

        assert_eq!(post.slug, "hello-world");
        // One lookup plus the update; no slug probe.
        assert_eq!(transaction_log(db).len(), 2);
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let views = ViewCountService::new(8);

        let result = service(&db, &views).delete("p1", "user_b").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_share_bumps_counter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let views = ViewCountService::new(8);

        service(&db, &views).share("p1").await.unwrap();

        let log = transaction_log_text(db);
        assert!(log.contains("share_count"));
    }

    #[tokio::test]
    async fn test_list_returns_total() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_post("p2", "b", PostStatus::Published),
                    create_test_post("p1", "a", PostStatus::Published),
                ]])
                .append_query_results([[count_row(12)]])
                .into_connection(),
        );
        let views = ViewCountService::new(8);
        let page = PageRequest {
            page: Some(2),
            limit: Some(2),
        };

        let (posts, total) = service(&db, &views)
            .list(page, Some(PostStatus::Published))
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(total, 12);
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        std::collections::BTreeMap::from([("num_items", sea_orm::Value::BigInt(Some(n)))])
    }
}
