//! API endpoints.

#![allow(missing_docs)]

mod ai;
mod blogs;
mod comments;
mod health;
mod users;

use axum::{Router, routing::get};

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/blogs", blogs::router())
        .nest("/comments", comments::router())
        .nest("/users", users::router())
        .nest("/ai", ai::router())
}
