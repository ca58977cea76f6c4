//! Add partial unique indexes over live (non-tombstoned) rows.
//!
//! A tombstoned row must not block re-creating the same slug, like, follow
//! or reading-list entry, so uniqueness only covers `deleted_at IS NULL`.

use sea_orm_migration::prelude::*;

const UP: &[&str] = &[
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_post_slug_live
    ON post (slug)
    WHERE deleted_at IS NULL;
    ",
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_post_like_post_actor_live
    ON post_like (post_id, actor_key)
    WHERE deleted_at IS NULL;
    ",
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_follow_pair_live
    ON follow (follower_key, followee_key)
    WHERE deleted_at IS NULL;
    ",
    r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_reading_list_user_post_live
    ON reading_list (user_key, post_id)
    WHERE deleted_at IS NULL;
    ",
    // Listing by status with newest first
    r"
    CREATE INDEX IF NOT EXISTS idx_post_status_created_live
    ON post (status, created_at DESC)
    WHERE deleted_at IS NULL;
    ",
    // Moderation queue
    r"
    CREATE INDEX IF NOT EXISTS idx_comment_pending_live
    ON comment (created_at DESC)
    WHERE status = 'pending' AND deleted_at IS NULL;
    ",
];

const DOWN: &[&str] = &[
    "DROP INDEX IF EXISTS idx_comment_pending_live;",
    "DROP INDEX IF EXISTS idx_post_status_created_live;",
    "DROP INDEX IF EXISTS idx_reading_list_user_post_live;",
    "DROP INDEX IF EXISTS idx_follow_pair_live;",
    "DROP INDEX IF EXISTS idx_post_like_post_actor_live;",
    "DROP INDEX IF EXISTS idx_post_slug_live;",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for sql in UP {
            manager.get_connection().execute_unprepared(sql).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for sql in DOWN {
            manager.get_connection().execute_unprepared(sql).await?;
        }
        Ok(())
    }
}
