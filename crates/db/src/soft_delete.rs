//! Tombstone-based deletion.
//!
//! Rows are never removed. Deleting sets `deleted_at`, and every read or
//! update that goes through [`SoftDelete::find_live`] or
//! [`SoftDelete::update_live`] ignores tombstoned rows.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select, UpdateMany, prelude::DateTimeWithTimeZone,
    sea_query::Expr,
};

/// Entities carrying a nullable `deleted_at` tombstone column.
pub trait SoftDelete: EntityTrait {
    /// The tombstone column.
    fn deleted_at_column() -> Self::Column;

    /// Select live rows only.
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }

    /// Update live rows only.
    fn update_live() -> UpdateMany<Self> {
        Self::update_many().filter(Self::deleted_at_column().is_null())
    }

    /// Tombstone live rows. Callers narrow it with `.filter(...)`.
    fn tombstone() -> UpdateMany<Self> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self::update_live().col_expr(Self::deleted_at_column(), Expr::value(now))
    }
}
