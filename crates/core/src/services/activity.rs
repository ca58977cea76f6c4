//! Activity log service.

use chrono::Utc;
use quill_common::IdGenerator;
use quill_db::{entities::activity, repositories::ActivityRepository};
use sea_orm::Set;
use tracing::warn;

/// Activity type recorded after a post is created.
pub const ACTIVITY_POST: &str = "create_post";
/// Activity type recorded after an authenticated like.
pub const ACTIVITY_LIKE: &str = "like";
/// Activity type recorded after a comment is submitted.
pub const ACTIVITY_COMMENT: &str = "comment";
/// Activity type recorded after a follow.
pub const ACTIVITY_FOLLOW: &str = "follow";

/// Best-effort, append-only activity log.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    id_gen: IdGenerator,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityRepository) -> Self {
        Self {
            activity_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Append an activity row. Failures are logged and swallowed.
    pub async fn log(
        &self,
        user_key: &str,
        activity_type: &str,
        entity_type: &str,
        entity_id: &str,
        metadata: Option<serde_json::Value>,
    ) {
        let model = activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_key: Set(user_key.to_string()),
            activity_type: Set(activity_type.to_string()),
            entity_type: Set(entity_type.to_string()),
            entity_id: Set(entity_id.to_string()),
            metadata: Set(metadata),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = self.activity_repo.create(model).await {
            warn!(
                user_key = %user_key,
                activity_type = %activity_type,
                error = %e,
                "Failed to log activity"
            );
        }
    }
}
