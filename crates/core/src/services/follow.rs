//! Follow service.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{
    db_error,
    entities::follow,
    repositories::{FollowRepository, UserProfileRepository},
};
use sea_orm::{DatabaseTransaction, Set};

use crate::services::{
    activity::{ACTIVITY_FOLLOW, ActivityService},
    profile::blank_profile,
};

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    profile_repo: UserProfileRepository,
    activity: ActivityService,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(
        follow_repo: FollowRepository,
        profile_repo: UserProfileRepository,
        activity: ActivityService,
    ) -> Self {
        Self {
            follow_repo,
            profile_repo,
            activity,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow `followee_key`. Returns `false` when already following.
    ///
    /// The edge and both counter increments commit together.
    pub async fn follow(&self, follower_key: &str, followee_key: &str) -> AppResult<bool> {
        if follower_key == followee_key {
            return Err(AppError::InvalidOperation(
                "Cannot follow yourself".to_string(),
            ));
        }

        let txn = self.follow_repo.begin().await?;

        if self
            .follow_repo
            .find_live(&txn, follower_key, followee_key)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        for key in lock_order(follower_key, followee_key) {
            let profile = blank_profile(self.id_gen.generate(), key, "");
            self.profile_repo.ensure_exists(&txn, profile).await?;
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_key: Set(follower_key.to_string()),
            followee_key: Set(followee_key.to_string()),
            created_at: Set(Utc::now().into()),
            deleted_at: Set(None),
        };
        match self.follow_repo.create(&txn, model).await {
            Ok(_) => {}
            // Lost a race with an identical follow; it already counted.
            Err(AppError::Conflict(_)) => return Ok(false),
            Err(e) => return Err(e),
        }

        self.adjust_counters(&txn, follower_key, followee_key, true)
            .await?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(follower = %follower_key, followee = %followee_key, "Followed user");
        self.activity
            .log(follower_key, ACTIVITY_FOLLOW, "user", followee_key, None)
            .await;

        Ok(true)
    }

    /// Unfollow `followee_key`. Returns `false` when not following.
    ///
    /// The tombstone and both counter decrements commit together.
    pub async fn unfollow(&self, follower_key: &str, followee_key: &str) -> AppResult<bool> {
        let txn = self.follow_repo.begin().await?;

        if self
            .follow_repo
            .delete(&txn, follower_key, followee_key)
            .await?
            == 0
        {
            return Ok(false);
        }

        self.adjust_counters(&txn, follower_key, followee_key, false)
            .await?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(follower = %follower_key, followee = %followee_key, "Unfollowed user");
        Ok(true)
    }

    /// Move the followee's `follower_count` and the follower's
    /// `following_count` by one, visiting the two profile rows in key order.
    async fn adjust_counters(
        &self,
        txn: &DatabaseTransaction,
        follower_key: &str,
        followee_key: &str,
        up: bool,
    ) -> AppResult<()> {
        for key in lock_order(follower_key, followee_key) {
            match (key == followee_key, up) {
                (true, true) => self.profile_repo.increment_follower_count(txn, key).await?,
                (true, false) => self.profile_repo.decrement_follower_count(txn, key).await?,
                (false, true) => self.profile_repo.increment_following_count(txn, key).await?,
                (false, false) => self.profile_repo.decrement_following_count(txn, key).await?,
            }
        }
        Ok(())
    }

    /// Check if `follower_key` follows `followee_key`.
    pub async fn is_following(&self, follower_key: &str, followee_key: &str) -> AppResult<bool> {
        self.follow_repo
            .is_following(follower_key, followee_key)
            .await
    }
}

/// Both keys, smallest first.
///
/// Every transaction touching a pair of profiles visits them in this order,
/// so mutual follows cannot lock the rows crosswise.
fn lock_order<'a>(a: &'a str, b: &'a str) -> [&'a str; 2] {
    if a <= b { [a, b] } else { [b, a] }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{transaction_log, transaction_log_text};
    use quill_db::repositories::ActivityRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_follow(follower: &str, followee: &str) -> follow::Model {
        follow::Model {
            id: "f1".to_string(),
            follower_key: follower.to_string(),
            followee_key: followee.to_string(),
            created_at: Utc::now().into(),
            deleted_at: None,
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn service(db: &Arc<DatabaseConnection>) -> FollowService {
        FollowService::new(
            FollowRepository::new(Arc::clone(db)),
            UserProfileRepository::new(Arc::clone(db)),
            ActivityService::new(ActivityRepository::new(Arc::clone(db))),
        )
    }

    /// Bound values of each profile counter update, in execution order.
    fn counter_updates(db: Arc<DatabaseConnection>) -> Vec<String> {
        transaction_log(db)
            .iter()
            .flat_map(|txn| txn.statements())
            .filter(|stmt| stmt.sql.starts_with("UPDATE \"user_profile\""))
            .map(|stmt| format!("{:?}", stmt.values))
            .collect()
    }

    #[tokio::test]
    async fn test_self_follow_is_invalid_and_touches_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(&db).follow("user_a", "user_a").await;

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
        assert_eq!(transaction_log_text(db), "[]");
    }

    #[tokio::test]
    async fn test_follow_creates_edge_and_bumps_both_counters() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .append_exec_results([exec(1), exec(1)])
                .append_query_results([[create_test_follow("user_a", "user_b")]])
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        let created = service(&db).follow("user_a", "user_b").await.unwrap();
        assert!(created);

        let log = transaction_log_text(db);
        assert!(log.contains("follower_count"));
        assert!(log.contains("following_count"));
        assert!(log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_follow_twice_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_follow("user_a", "user_b")]])
                .into_connection(),
        );

        let created = service(&db).follow("user_a", "user_b").await.unwrap();
        assert!(!created);

        let log = transaction_log_text(db);
        assert!(!log.contains("follower_count"));
        assert!(!log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_unfollow_when_not_following_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(0)])
                .into_connection(),
        );

        let removed = service(&db).unfollow("user_a", "user_b").await.unwrap();
        assert!(!removed);
        assert!(!transaction_log_text(db).contains("GREATEST"));
    }

    #[tokio::test]
    async fn test_unfollow_decrements_both_counters() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(1), exec(1)])
                .into_connection(),
        );

        let removed = service(&db).unfollow("user_a", "user_b").await.unwrap();
        assert!(removed);

        let log = transaction_log_text(db);
        assert!(log.contains("GREATEST(follower_count - 1, 0)"));
        assert!(log.contains("GREATEST(following_count - 1, 0)"));
        assert!(log.contains("COMMIT"));
    }

    #[tokio::test]
    async fn test_mutual_follow_updates_profiles_in_key_order() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .append_exec_results([exec(1), exec(1)])
                .append_query_results([[create_test_follow("user_b", "user_a")]])
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        // user_b follows user_a: the followee's row sorts first.
        assert!(service(&db).follow("user_b", "user_a").await.unwrap());

        let updates = counter_updates(db);
        assert_eq!(updates.len(), 2);
        assert!(updates[0].contains("user_a"));
        assert!(updates[1].contains("user_b"));
    }

    #[tokio::test]
    async fn test_unfollow_updates_profiles_in_key_order() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([exec(1), exec(1), exec(1)])
                .into_connection(),
        );

        assert!(service(&db).unfollow("user_a", "user_b").await.unwrap());

        let updates = counter_updates(db);
        assert_eq!(updates.len(), 2);
        assert!(updates[0].contains("user_a"));
        assert!(updates[1].contains("user_b"));
    }

    #[test]
    fn test_lock_order_is_independent_of_direction() {
        assert_eq!(lock_order("bob", "alice"), ["alice", "bob"]);
        assert_eq!(lock_order("alice", "bob"), ["alice", "bob"]);
    }
}
