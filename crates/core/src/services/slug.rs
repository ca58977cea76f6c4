//! Slug allocator.
//!
//! Turns a title into a URL-safe slug and probes the store for the first
//! free variant (`base`, `base-1`, `base-2`, ...). The probe and the later
//! insert are not atomic; the live-slug unique index is the final guard and
//! callers retry allocation when an insert reports a conflict.

use quill_common::AppResult;
use quill_db::repositories::PostRepository;

/// Slug used when a title has no characters in `[a-z0-9-]`.
pub const FALLBACK_SLUG: &str = "post";

/// Lowercase, spaces to hyphens, drop everything outside `[a-z0-9-]`.
#[must_use]
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Allocates slugs unique among live posts.
#[derive(Clone)]
pub struct SlugAllocator {
    post_repo: PostRepository,
}

impl SlugAllocator {
    /// Create a new slug allocator.
    #[must_use]
    pub const fn new(post_repo: PostRepository) -> Self {
        Self { post_repo }
    }

    /// First free slug for `title`, ignoring the post `exclude_id`.
    pub async fn allocate(&self, title: &str, exclude_id: Option<&str>) -> AppResult<String> {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut suffix = 1u32;

        while self.post_repo.slug_taken(&candidate, exclude_id).await? {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }

        Ok(candidate)
    }
}
