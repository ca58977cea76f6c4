//! Core business logic for quill.
//!
//! Services sit between the HTTP layer and the repositories in `quill-db`.
//! The counter-maintaining mutators ([`LikeService`], [`FollowService`]) pair
//! each relationship row with its counter delta in one transaction.

pub mod services;

pub use services::*;
