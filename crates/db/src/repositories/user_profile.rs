//! User profile repository.

use std::sync::Arc;

use crate::{
    db_error,
    entities::{UserProfile, user_profile},
    repositories::post::AuthorTotals,
    soft_delete::SoftDelete,
};
use chrono::Utc;
use quill_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IdenStatic,
    QueryFilter, prelude::DateTimeWithTimeZone,
    sea_query::{Expr, OnConflict},
};

/// User profile repository for database operations.
#[derive(Clone)]
pub struct UserProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl UserProfileRepository {
    /// Create a new user profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a profile by identity key.
    pub async fn find_by_user_key(&self, user_key: &str) -> AppResult<Option<user_profile::Model>> {
        UserProfile::find_live()
            .filter(user_profile::Column::UserKey.eq(user_key))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Get a profile by identity key, returning an error if not found.
    pub async fn get_by_user_key(&self, user_key: &str) -> AppResult<user_profile::Model> {
        self.find_by_user_key(user_key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("UserProfile: {user_key}")))
    }

    /// Create a new profile.
    pub async fn create(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update a profile.
    pub async fn update(&self, model: user_profile::ActiveModel) -> AppResult<user_profile::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Insert `model` on `conn` unless a profile with its key already exists.
    pub async fn ensure_exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: user_profile::ActiveModel,
    ) -> AppResult<()> {
        UserProfile::insert(model)
            .on_conflict(
                OnConflict::column(user_profile::Column::UserKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Add one to `follower_count` on `conn`.
    pub async fn increment_follower_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_key: &str,
    ) -> AppResult<()> {
        Self::bump(conn, user_key, user_profile::Column::FollowerCount, true).await
    }

    /// Subtract one from `follower_count` on `conn`, floored at zero.
    pub async fn decrement_follower_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_key: &str,
    ) -> AppResult<()> {
        Self::bump(conn, user_key, user_profile::Column::FollowerCount, false).await
    }

    /// Add one to `following_count` on `conn`.
    pub async fn increment_following_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_key: &str,
    ) -> AppResult<()> {
        Self::bump(conn, user_key, user_profile::Column::FollowingCount, true).await
    }

    /// Subtract one from `following_count` on `conn`, floored at zero.
    pub async fn decrement_following_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_key: &str,
    ) -> AppResult<()> {
        Self::bump(conn, user_key, user_profile::Column::FollowingCount, false).await
    }

    async fn bump<C: ConnectionTrait>(
        conn: &C,
        user_key: &str,
        column: user_profile::Column,
        up: bool,
    ) -> AppResult<()> {
        let expr = if up {
            Expr::col(column).add(1)
        } else {
            Expr::cust(format!("GREATEST({} - 1, 0)", column.as_str()))
        };

        UserProfile::update_live()
            .col_expr(column, expr)
            .filter(user_profile::Column::UserKey.eq(user_key))
            .exec(conn)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Record activity on the profile.
    pub async fn touch_last_active(&self, user_key: &str) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        UserProfile::update_live()
            .col_expr(user_profile::Column::LastActiveAt, Expr::value(now))
            .filter(user_profile::Column::UserKey.eq(user_key))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }

    /// Overwrite the cached post aggregates.
    pub async fn write_totals(&self, user_key: &str, totals: AuthorTotals) -> AppResult<()> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        UserProfile::update_live()
            .col_expr(user_profile::Column::PostCount, Expr::value(totals.post_count))
            .col_expr(user_profile::Column::TotalViews, Expr::value(totals.total_views))
            .col_expr(user_profile::Column::TotalLikes, Expr::value(totals.total_likes))
            .col_expr(user_profile::Column::UpdatedAt, Expr::value(now))
            .filter(user_profile::Column::UserKey.eq(user_key))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
