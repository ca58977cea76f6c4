//! Like service.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{
    db_error,
    entities::post_like::{self, LikerKind},
    repositories::{PostLikeRepository, PostRepository},
};
use sea_orm::Set;
use serde::Serialize;
use serde_json::json;

use crate::services::{
    activity::{ACTIVITY_LIKE, ActivityService},
    identity::Actor,
};

/// Like state of a post as seen by one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i32,
}

/// Like service for business logic.
#[derive(Clone)]
pub struct LikeService {
    like_repo: PostLikeRepository,
    post_repo: PostRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: PostLikeRepository,
        post_repo: PostRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like the post if `actor` has not, otherwise unlike it.
    ///
    /// The like row and the `like_count` delta commit together. A concurrent
    /// duplicate like is rejected by the live unique index and surfaces as
    /// a conflict with nothing applied.
    pub async fn toggle(&self, post_id: &str, actor: &Actor) -> AppResult<LikeState> {
        self.post_repo.get_by_id(post_id).await?;

        let txn = self.like_repo.begin().await?;
        let liked = match self.like_repo.find_live(&txn, post_id, &actor.key).await? {
            Some(existing) => {
                if self.like_repo.delete(&txn, &existing.id).await? > 0 {
                    self.post_repo.decrement_like_count(&txn, post_id).await?;
                }
                false
            }
            None => {
                let now = Utc::now().into();
                let model = post_like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    post_id: Set(post_id.to_string()),
                    actor_key: Set(actor.key.clone()),
                    actor_kind: Set(actor.kind),
                    created_at: Set(now),
                    updated_at: Set(now),
                    deleted_at: Set(None),
                };
                self.like_repo.create(&txn, model).await?;
                // The post was tombstoned after the existence check.
                if self.post_repo.increment_like_count(&txn, post_id).await? == 0 {
                    return Err(AppError::NotFound(format!("Post not found: {post_id}")));
                }
                true
            }
        };
        txn.commit().await.map_err(db_error)?;

        let post = self.post_repo.get_by_id(post_id).await?;
        tracing::debug!(post_id = %post_id, liked, like_count = post.like_count, "Toggled like");

        if liked
            && actor.kind == LikerKind::Authenticated
            && let Some(subject) = &actor.subject
        {
            self.activity
                .log(
                    subject,
                    ACTIVITY_LIKE,
                    "post",
                    post_id,
                    Some(json!({ "title": post.title })),
                )
                .await;
        }

        Ok(LikeState {
            liked,
            like_count: post.like_count,
        })
    }

    /// Current like state without changing it.
    pub async fn status(&self, post_id: &str, actor: &Actor) -> AppResult<LikeState> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let liked = self.like_repo.has_liked(post_id, &actor.key).await?;

        Ok(LikeState {
            liked,
            like_count: post.like_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::{
        identity::IdentityResolver,
        test_support::{transaction_log, transaction_log_text},
    };
    use quill_db::{
        entities::post::{self, PostStatus},
        repositories::ActivityRepository,
    };
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_post(id: &str, like_count: i32) -> post::Model {
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
            like_count,
            share_count: 0,
            published_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn create_test_like(post_id: &str, actor_key: &str) -> post_like::Model {
        post_like::Model {
            id: "l1".to_string(),
            post_id: post_id.to_string(),
            actor_key: actor_key.to_string(),
            actor_kind: LikerKind::Anonymous,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> LikeService {
        LikeService::new(
            PostLikeRepository::new(Arc::clone(db)),
            PostRepository::new(Arc::clone(db)),
            ActivityService::new(ActivityRepository::new(Arc::clone(db))),
        )
    }

    fn anonymous() -> Actor {
        IdentityResolver::new("salt").resolve(None, "203.0.113.7")
    }

    #[tokio::test]
    async fn test_toggle_on_inserts_and_increments_in_one_transaction() {
        let actor = anonymous();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", 0)]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_results([[create_test_like("p1", &actor.key)]])
                .append_exec_results([exec_ok()])
                .append_query_results([[create_test_post("p1", 1)]])
                .into_connection(),
        );

        let state = service(&db).toggle("p1", &actor).await.unwrap();
        assert_eq!(
            state,
            LikeState {
                liked: true,
                like_count: 1,
            }
        );

        let log = transaction_log_text(db);
        assert!(log.contains("INSERT INTO \\\"post_like\\\""));
        assert!(log.contains("\\\"like_count\\\" + "));
    }

    #[tokio::test]
    async fn test_toggle_off_tombstones_and_decrements() {
        let actor = anonymous();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", 1)]])
                .append_query_results([[create_test_like("p1", &actor.key)]])
                .append_exec_results([exec_ok(), exec_ok()])
                .append_query_results([[create_test_post("p1", 0)]])
                .into_connection(),
        );

        let state = service(&db).toggle("p1", &actor).await.unwrap();
        assert_eq!(
            state,
            LikeState {
                liked: false,
                like_count: 0,
            }
        );

        let log = transaction_log_text(db);
        assert!(log.contains("GREATEST(like_count - 1, 0)"));
    }

    #[tokio::test]
    async fn test_toggle_missing_post_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(&db).toggle("missing", &anonymous()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_increment_leaves_no_like() {
        let actor = anonymous();
        // The counter update has no scripted result and fails.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", 0)]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_results([[create_test_like("p1", &actor.key)]])
                .into_connection(),
        );

        let result = service(&db).toggle("p1", &actor).await;
        assert!(result.is_err());

        let log = transaction_log_text(db);
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_like_on_vanished_post_rolls_back() {
        let actor = anonymous();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", 0)]])
                .append_query_results([Vec::<post_like::Model>::new()])
                .append_query_results([[create_test_like("p1", &actor.key)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let result = service(&db).toggle("p1", &actor).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // The existence check, then the rolled back toggle.
        let log = transaction_log(db);
        assert_eq!(log.len(), 2);
        let last = log[1].statements().last().unwrap();
        assert_eq!(last.sql, "ROLLBACK");
    }

    #[tokio::test]
    async fn test_status() {
        let actor = anonymous();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", 3)]])
                .append_query_results([[create_test_like("p1", &actor.key)]])
                .into_connection(),
        );

        let state = service(&db).status("p1", &actor).await.unwrap();
        assert!(state.liked);
        assert_eq!(state.like_count, 3);
    }
}
