//! Blog post endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use quill_common::{AppError, AppResult, PageRequest};
use quill_core::{LikeState, PostInput, SubmitCommentInput};
use quill_db::entities::{
    comment,
    post::{self, PostStatus},
};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, ClientIp, MaybeAuthUser},
    middleware::AppState,
    response::{ApiResponse, Message, Paginated},
};

/// List query.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

impl ListQuery {
    fn status(&self) -> AppResult<Option<PostStatus>> {
        match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => PostStatus::parse(raw)
                .map(Some)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {raw}"))),
        }
    }
}

/// List live posts, newest first.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Paginated<post::Model>> {
    let status = query.status()?;
    let page = PageRequest {
        page: query.page,
        limit: query.limit,
    };

    let (posts, total) = state.post_service.list(page, status).await?;

    Ok(Paginated {
        data: posts,
        pagination: page.paginate(total),
    })
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<post::Model>> {
    Ok(ApiResponse::ok(state.post_service.get_by_id(&id).await?))
}

async fn show_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<ApiResponse<post::Model>> {
    Ok(ApiResponse::ok(state.post_service.get_by_slug(&slug).await?))
}

/// Approved comments, oldest first.
async fn comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<comment::Model>>> {
    Ok(ApiResponse::ok(state.comment_service.approved(&id).await?))
}

/// Submit a comment into the moderation queue.
async fn submit_comment(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubmitCommentInput>,
) -> AppResult<ApiResponse<comment::Model>> {
    let commenter = user.as_ref().map(|u| u.subject.as_str());
    let comment = state.comment_service.submit(&id, input, commenter).await?;
    Ok(ApiResponse::created(comment))
}

async fn like_status(
    MaybeAuthUser(user): MaybeAuthUser,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeState>> {
    let actor = state.identity_resolver.resolve(user.as_ref(), &ip);
    Ok(ApiResponse::ok(state.like_service.status(&id, &actor).await?))
}

/// Like the post, or unlike it if the caller already has.
async fn toggle_like(
    MaybeAuthUser(user): MaybeAuthUser,
    ClientIp(ip): ClientIp,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeState>> {
    let actor = state.identity_resolver.resolve(user.as_ref(), &ip);
    Ok(ApiResponse::ok(state.like_service.toggle(&id, &actor).await?))
}

async fn share(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Message>> {
    state.post_service.share(&id).await?;
    Ok(Message::new("Share recorded"))
}

/// The caller's drafts and published posts.
async fn drafts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<post::Model>>> {
    Ok(ApiResponse::ok(
        state.post_service.list_drafts(&user.subject).await?,
    ))
}

/// Create a post with the status given in the body.
async fn create_draft(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    Ok(ApiResponse::created(
        state.post_service.create(input, &user).await?,
    ))
}

/// Create a published post.
async fn publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    Ok(ApiResponse::created(
        state.post_service.publish(input, &user).await?,
    ))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PostInput>,
) -> AppResult<ApiResponse<post::Model>> {
    Ok(ApiResponse::ok(
        state.post_service.update(&id, input, &user.subject).await?,
    ))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Message>> {
    state.post_service.delete(&id, &user.subject).await?;
    Ok(Message::new("Blog deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/drafts", get(drafts))
        .route("/draft", post(create_draft))
        .route("/publish", post(publish))
        .route("/slug/{slug}", get(show_by_slug))
        .route("/{id}", get(show).put(update).delete(delete))
        .route("/{id}/comments", get(comments).post(submit_comment))
        .route("/{id}/like-status", get(like_status))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/share", post(share))
}
