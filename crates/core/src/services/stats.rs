//! Stats aggregator.

use quill_common::AppResult;
use quill_db::repositories::{PostRepository, UserProfileRepository};
use serde::Serialize;

use crate::services::profile::ProfileService;

/// A user's derived totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub post_count: i64,
    pub total_views: i64,
    pub total_likes: i64,
    /// Counter-maintained by follow/unfollow; not recomputed here.
    pub follower_count: i32,
    pub following_count: i32,
}

/// Recomputes post aggregates from source rows and heals the profile copy.
#[derive(Clone)]
pub struct StatsService {
    post_repo: PostRepository,
    profile_repo: UserProfileRepository,
    profiles: ProfileService,
}

impl StatsService {
    /// Create a new stats service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        profile_repo: UserProfileRepository,
        profiles: ProfileService,
    ) -> Self {
        Self {
            post_repo,
            profile_repo,
            profiles,
        }
    }

    /// Recompute `user_key`'s totals and write them back onto the profile.
    pub async fn recompute(&self, user_key: &str, display_name: &str) -> AppResult<UserStats> {
        let profile = self.profiles.get_or_create(user_key, display_name).await?;
        let totals = self.post_repo.author_totals(user_key).await?;
        self.profile_repo.write_totals(user_key, totals).await?;

        Ok(UserStats {
            post_count: totals.post_count,
            total_views: totals.total_views,
            total_likes: totals.total_likes,
            follower_count: profile.follower_count,
            following_count: profile.following_count,
        })
    }
}
