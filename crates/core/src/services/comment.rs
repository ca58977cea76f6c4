//! Comment moderation queue.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{
    entities::comment::{self, CommentStatus},
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::activity::{ACTIVITY_COMMENT, ActivityService};

/// Input for submitting a comment. Any status the caller sends is ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCommentInput {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    #[validate(length(min = 1, max = 256))]
    pub author_name: String,

    #[validate(email)]
    pub author_email: String,

    pub parent_id: Option<String>,
}

/// A pending comment with enough post context for a moderator.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingComment {
    #[serde(flatten)]
    pub comment: comment::Model,
    /// Empty when the post could not be loaded.
    pub post_title: String,
    pub post_slug: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a comment. It always starts out pending.
    pub async fn submit(
        &self,
        post_id: &str,
        input: SubmitCommentInput,
        commenter: Option<&str>,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        self.post_repo.get_by_id(post_id).await?;

        if let Some(parent_id) = &input.parent_id
            && self
                .comment_repo
                .find_on_post(parent_id, post_id)
                .await?
                .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Parent comment not found: {parent_id}"
            )));
        }

        let now = Utc::now().into();
        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post_id.to_string()),
            content: Set(input.content),
            author_name: Set(input.author_name),
            author_email: Set(input.author_email),
            status: Set(CommentStatus::Pending),
            parent_id: Set(input.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let comment = self.comment_repo.create(model).await?;
        tracing::info!(
            comment_id = %comment.id,
            post_id = %post_id,
            "Comment queued for moderation"
        );

        if let Some(user_key) = commenter {
            self.activity
                .log(user_key, ACTIVITY_COMMENT, "post", post_id, None)
                .await;
        }

        Ok(comment)
    }

    /// Approved comments on a post, oldest first.
    pub async fn approved(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_approved_by_post(post_id).await
    }

    /// The moderation queue, newest first.
    ///
    /// A comment whose post cannot be loaded is kept with blank post context.
    pub async fn pending(&self) -> AppResult<Vec<PendingComment>> {
        let comments = self.comment_repo.find_pending().await?;
        let mut queue = Vec::with_capacity(comments.len());

        for comment in comments {
            let (post_title, post_slug) = match self.post_repo.find_by_id(&comment.post_id).await {
                Ok(Some(post)) => (post.title, post.slug),
                Ok(None) => {
                    tracing::warn!(
                        comment_id = %comment.id,
                        post_id = %comment.post_id,
                        "Pending comment on missing post"
                    );
                    (String::new(), String::new())
                }
                Err(e) => {
                    tracing::warn!(
                        comment_id = %comment.id,
                        error = %e,
                        "Failed to load post for pending comment"
                    );
                    (String::new(), String::new())
                }
            };

            queue.push(PendingComment {
                comment,
                post_title,
                post_slug,
            });
        }

        Ok(queue)
    }

    /// Approve a comment.
    pub async fn approve(&self, id: &str) -> AppResult<()> {
        self.transition(id, CommentStatus::Approved).await
    }

    /// Reject a comment.
    pub async fn reject(&self, id: &str) -> AppResult<()> {
        self.transition(id, CommentStatus::Rejected).await
    }

    async fn transition(&self, id: &str, status: CommentStatus) -> AppResult<()> {
        if self.comment_repo.set_status(id, status).await? == 0 {
            return Err(AppError::NotFound(format!("Comment not found: {id}")));
        }
        tracing::info!(comment_id = %id, status = ?status, "Moderated comment");
        Ok(())
    }

    /// Delete a comment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.comment_repo.delete(id).await? == 0 {
            return Err(AppError::NotFound(format!("Comment not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::transaction_log_text;
    use quill_db::{
        entities::post::{self, PostStatus},
        repositories::ActivityRepository,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::sync::Arc;

    fn create_test_post(id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            title: "Hello".to_string(),
            content: "Body".to_string(),
            excerpt: "Body".to_string(),
            slug: "hello".to_string(),
            author_key: "author".to_string(),
            author_name: "Ada".to_string(),
            author_email: String::new(),
            status: PostStatus::Published,
            tags: json!([]),
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

    fn create_test_comment(id: &str, post_id: &str, status: CommentStatus) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            post_id: post_id.to_string(),
            content: "Nice".to_string(),
            author_name: "Bob".to_string(),
            author_email: "bob@example.com".to_string(),
            status,
            parent_id: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn input(parent_id: Option<&str>) -> SubmitCommentInput {
        SubmitCommentInput {
            content: "Nice".to_string(),
            author_name: "Bob".to_string(),
            author_email: "bob@example.com".to_string(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::clone(db)),
            PostRepository::new(Arc::clone(db)),
            ActivityService::new(ActivityRepository::new(Arc::clone(db))),
        )
    }

    #[tokio::test]
    async fn test_submit_is_always_pending() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1")]])
                .append_query_results([[create_test_comment("c1", "p1", CommentStatus::Pending)]])
                .into_connection(),
        );

        let comment = service(&db).submit("p1", input(None), None).await.unwrap();
        assert_eq!(comment.status, CommentStatus::Pending);

        let log = transaction_log_text(db);
        assert!(log.contains("pending"));
        assert!(!log.contains("approved"));
    }

    #[test]
    fn test_status_field_in_body_is_ignored() {
        let body = json!({
            "content": "Nice",
            "authorName": "Bob",
            "authorEmail": "bob@example.com",
            "status": "approved",
        });

        let parsed: SubmitCommentInput = serde_json::from_value(body).unwrap();
        assert!(parsed.parent_id.is_none());
    }

    #[tokio::test]
    async fn test_submit_orphan_parent_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1")]])
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let result = service(&db)
            .submit("p1", input(Some("nonexistent")), None)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let log = transaction_log_text(db);
        assert!(!log.contains("INSERT"));
    }

    #[tokio::test]
    async fn test_submit_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(&db).submit("missing", input(None), None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_invalid_email_never_reaches_store() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let mut bad = input(None);
        bad.author_email = "not-an-email".to_string();
        let result = service(&db).submit("p1", bad, None).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(transaction_log_text(db), "[]");
    }

    #[tokio::test]
    async fn test_pending_keeps_comment_when_post_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_comment("c2", "p2", CommentStatus::Pending),
                    create_test_comment("c1", "gone", CommentStatus::Pending),
                ]])
                .append_query_results([[create_test_post("p2")]])
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let queue = service(&db).pending().await.unwrap();

        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].post_title, "Hello");
        assert_eq!(queue[1].comment.id, "c1");
        assert!(queue[1].post_title.is_empty());
    }

    #[tokio::test]
    async fn test_approve_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(&db).approve("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
