//! Text-generation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use quill_common::AppResult;
use quill_core::{GenerateContentInput, GenerateMetaInput, GeneratedContent, GeneratedMeta};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

async fn generate_content(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateContentInput>,
) -> AppResult<ApiResponse<GeneratedContent>> {
    info!(user = %user.subject, title = %input.title, "Generating post content");
    Ok(ApiResponse::ok(
        state.ai_service.generate_content(input).await?,
    ))
}

async fn generate_meta(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateMetaInput>,
) -> AppResult<ApiResponse<GeneratedMeta>> {
    Ok(ApiResponse::ok(state.ai_service.generate_meta(input).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate-content", post(generate_content))
        .route("/generate-meta", post(generate_meta))
}
