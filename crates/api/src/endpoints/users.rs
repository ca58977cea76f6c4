//! User endpoints: profile, stats, follows, reading list.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use quill_common::AppResult;
use quill_core::{UpdateProfileInput, UserStats};
use quill_db::entities::{post, user_profile};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub is_following: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListResponse {
    pub post_id: String,
    pub saved: bool,
}

/// The caller's profile, created on first access.
async fn profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<user_profile::Model>> {
    Ok(ApiResponse::ok(
        state
            .profile_service
            .get_or_create(&user.subject, &user.name)
            .await?,
    ))
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<user_profile::Model>> {
    Ok(ApiResponse::ok(
        state.profile_service.update(&user.subject, input).await?,
    ))
}

/// Recomputed post totals plus follow counters.
async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserStats>> {
    Ok(ApiResponse::ok(
        state
            .stats_service
            .recompute(&user.subject, &user.name)
            .await?,
    ))
}

async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FollowResponse>> {
    state.follow_service.follow(&user.subject, &id).await?;
    Ok(ApiResponse::ok(FollowResponse { is_following: true }))
}

async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FollowResponse>> {
    state.follow_service.unfollow(&user.subject, &id).await?;
    Ok(ApiResponse::ok(FollowResponse {
        is_following: false,
    }))
}

async fn follow_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<FollowResponse>> {
    let is_following = state.follow_service.is_following(&user.subject, &id).await?;
    Ok(ApiResponse::ok(FollowResponse { is_following }))
}

async fn reading_list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<post::Model>>> {
    Ok(ApiResponse::ok(
        state.reading_list_service.list(&user.subject).await?,
    ))
}

async fn save(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<ReadingListResponse>> {
    state
        .reading_list_service
        .add(&user.subject, &post_id)
        .await?;
    Ok(ApiResponse::ok(ReadingListResponse {
        post_id,
        saved: true,
    }))
}

async fn unsave(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<ReadingListResponse>> {
    state
        .reading_list_service
        .remove(&user.subject, &post_id)
        .await?;
    Ok(ApiResponse::ok(ReadingListResponse {
        post_id,
        saved: false,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/stats", get(stats))
        .route("/reading-list", get(reading_list))
        .route("/reading-list/{post_id}", post(save).delete(unsave))
        .route("/{id}/follow", post(follow).delete(unfollow))
        .route("/{id}/follow-status", get(follow_status))
}
