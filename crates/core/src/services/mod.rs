//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod ai;
pub mod auth;
pub mod comment;
pub mod follow;
pub mod identity;
pub mod like;
pub mod post;
pub mod profile;
pub mod reading_list;
pub mod slug;
pub mod stats;
pub mod views;

#[cfg(test)]
mod test_support;

pub use activity::ActivityService;
pub use ai::{
    AiService, GenerateContentInput, GenerateMetaInput, GeneratedContent, GeneratedMeta,
    OpenAiGenerator, TextGenerator,
};
pub use auth::{Identity, IdentityProvider, JwtIdentityProvider};
pub use comment::{CommentService, PendingComment, SubmitCommentInput};
pub use follow::FollowService;
pub use identity::{Actor, IdentityResolver};
pub use like::{LikeService, LikeState};
pub use post::{PostInput, PostService};
pub use profile::{ProfileService, UpdateProfileInput};
pub use reading_list::ReadingListService;
pub use slug::{SlugAllocator, slugify};
pub use stats::{StatsService, UserStats};
pub use views::{ViewCountService, ViewCounter};
