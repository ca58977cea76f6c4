//! Database repositories.

#![allow(missing_docs)]

pub mod activity;
pub mod comment;
pub mod follow;
pub mod post;
pub mod post_like;
pub mod reading_list;
pub mod user_profile;

pub use activity::ActivityRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use post::{AuthorTotals, PostRepository};
pub use post_like::PostLikeRepository;
pub use reading_list::ReadingListRepository;
pub use user_profile::UserProfileRepository;
