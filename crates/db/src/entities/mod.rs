//! Database entities.

#![allow(missing_docs)]

pub mod activity;
pub mod comment;
pub mod follow;
pub mod post;
pub mod post_like;
pub mod reading_list;
pub mod user_profile;

pub use activity::Entity as Activity;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use post::Entity as Post;
pub use post_like::Entity as PostLike;
pub use reading_list::Entity as ReadingList;
pub use user_profile::Entity as UserProfile;
