//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use quill_common::Config;
use quill_core::{
    ActivityService, AiService, CommentService, FollowService, IdentityProvider,
    IdentityResolver, LikeService, PostService, ProfileService, ReadingListService, StatsService,
    TextGenerator, ViewCounter,
};
use quill_db::repositories::{
    ActivityRepository, CommentRepository, FollowRepository, PostLikeRepository, PostRepository,
    ReadingListRepository, UserProfileRepository,
};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub post_service: PostService,
    pub like_service: LikeService,
    pub comment_service: CommentService,
    pub follow_service: FollowService,
    pub profile_service: ProfileService,
    pub stats_service: StatsService,
    pub reading_list_service: ReadingListService,
    pub ai_service: AiService,
    pub identity_resolver: IdentityResolver,
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: &Config,
        identity_provider: Arc<dyn IdentityProvider>,
        generator: Arc<dyn TextGenerator>,
        views: ViewCounter,
    ) -> Self {
        let post_repo = PostRepository::new(Arc::clone(&db));
        let profile_repo = UserProfileRepository::new(Arc::clone(&db));
        let activity = ActivityService::new(ActivityRepository::new(Arc::clone(&db)));
        let profile_service = ProfileService::new(profile_repo.clone());

        Self {
            post_service: PostService::new(post_repo.clone(), views, activity.clone()),
            like_service: LikeService::new(
                PostLikeRepository::new(Arc::clone(&db)),
                post_repo.clone(),
                activity.clone(),
            ),
            comment_service: CommentService::new(
                CommentRepository::new(Arc::clone(&db)),
                post_repo.clone(),
                activity.clone(),
            ),
            follow_service: FollowService::new(
                FollowRepository::new(Arc::clone(&db)),
                profile_repo.clone(),
                activity,
            ),
            stats_service: StatsService::new(
                post_repo.clone(),
                profile_repo,
                profile_service.clone(),
            ),
            reading_list_service: ReadingListService::new(
                ReadingListRepository::new(db),
                post_repo,
            ),
            profile_service,
            ai_service: AiService::new(generator, config.ai.max_tokens),
            identity_resolver: IdentityResolver::new(&config.identity.ip_salt),
            identity_provider,
        }
    }
}

/// Authentication middleware.
///
/// Attaches the verified [`quill_core::Identity`] when a valid bearer token
/// is present. Invalid tokens are treated as anonymous; protected routes
/// reject them through the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get(AUTHORIZATION)
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.identity_provider.verify(token.trim()).await {
            Ok(identity) => {
                state
                    .profile_service
                    .touch_last_active(&identity.subject)
                    .await;
                req.extensions_mut().insert(identity);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
