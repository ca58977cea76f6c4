//! HTTP API layer for quill.
//!
//! - **Endpoints**: blogs, comments, users, AI helpers, health
//! - **Extractors**: verified identity, optional identity, client IP
//! - **Middleware**: bearer token verification
//!
//! Built on Axum 0.8. Success bodies are wrapped as `{"data": ...}`;
//! failures render through [`quill_common::AppError`].

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
