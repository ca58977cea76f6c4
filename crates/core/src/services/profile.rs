//! Profile service.

use chrono::Utc;
use quill_common::{AppError, AppResult, IdGenerator};
use quill_db::{entities::user_profile, repositories::UserProfileRepository};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

/// Input for updating a profile. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    #[validate(length(max = 64))]
    pub twitter_handle: Option<String>,

    #[validate(length(max = 512))]
    pub linked_in_profile: Option<String>,

    #[validate(length(max = 32))]
    pub interests: Option<Vec<String>>,
}

/// Build an empty profile row for `user_key`.
pub(crate) fn blank_profile(
    id: String,
    user_key: &str,
    display_name: &str,
) -> user_profile::ActiveModel {
    let now = Utc::now().into();
    user_profile::ActiveModel {
        id: Set(id),
        user_key: Set(user_key.to_string()),
        display_name: Set(display_name.to_string()),
        bio: Set(None),
        website: Set(None),
        location: Set(None),
        twitter_handle: Set(None),
        linkedin_profile: Set(None),
        interests: Set(json!([])),
        follower_count: Set(0),
        following_count: Set(0),
        post_count: Set(0),
        total_views: Set(0),
        total_likes: Set(0),
        is_verified: Set(false),
        joined_at: Set(now),
        last_active_at: Set(Some(now)),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: UserProfileRepository,
    id_gen: IdGenerator,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: UserProfileRepository) -> Self {
        Self {
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get the caller's profile, creating an empty one on first access.
    pub async fn get_or_create(
        &self,
        user_key: &str,
        display_name: &str,
    ) -> AppResult<user_profile::Model> {
        if let Some(profile) = self.profile_repo.find_by_user_key(user_key).await? {
            return Ok(profile);
        }

        let model = blank_profile(self.id_gen.generate(), user_key, display_name);
        match self.profile_repo.create(model).await {
            Ok(profile) => {
                tracing::info!(user_key = %user_key, "Created profile");
                Ok(profile)
            }
            // Created concurrently by another request
            Err(AppError::Conflict(_)) => self.profile_repo.get_by_user_key(user_key).await,
            Err(e) => Err(e),
        }
    }

    /// Get a profile by key.
    pub async fn get(&self, user_key: &str) -> AppResult<user_profile::Model> {
        self.profile_repo.get_by_user_key(user_key).await
    }

    /// Update the editable profile fields.
    pub async fn update(
        &self,
        user_key: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user_profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_key(user_key).await?;
        let mut active: user_profile::ActiveModel = profile.into();

        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(website) = input.website {
            active.website = Set(Some(website));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(handle) = input.twitter_handle {
            active.twitter_handle = Set(Some(handle));
        }
        if let Some(linkedin) = input.linked_in_profile {
            active.linkedin_profile = Set(Some(linkedin));
        }
        if let Some(interests) = input.interests {
            active.interests = Set(json!(interests));
        }
        active.updated_at = Set(Utc::now().into());

        self.profile_repo.update(active).await
    }

    /// Record that the user was active. Failures are logged and swallowed.
    pub async fn touch_last_active(&self, user_key: &str) {
        if let Err(e) = self.profile_repo.touch_last_active(user_key).await {
            tracing::warn!(user_key = %user_key, error = %e, "Failed to update last activity");
        }
    }
}
