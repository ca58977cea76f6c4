//! Comment moderation endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use quill_common::AppResult;
use quill_core::PendingComment;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, Message},
};

/// Pending comments, newest first.
async fn pending(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PendingComment>>> {
    Ok(ApiResponse::ok(state.comment_service.pending().await?))
}

async fn approve(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Message>> {
    state.comment_service.approve(&id).await?;
    Ok(Message::new("Comment approved"))
}

async fn reject(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Message>> {
    state.comment_service.reject(&id).await?;
    Ok(Message::new("Comment rejected"))
}

async fn remove(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Message>> {
    state.comment_service.delete(&id).await?;
    Ok(Message::new("Comment deleted"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(pending))
        .route("/{id}/approve", put(approve))
        .route("/{id}/reject", put(reject))
        .route("/{id}", delete(remove))
}
