//! Database layer for quill.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod soft_delete;
pub mod test_utils;

pub use soft_delete::SoftDelete;

use quill_common::{AppError, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt).await.map_err(db_error)
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None).await.map_err(db_error)
}

/// Map a store error onto the application taxonomy.
///
/// Unique-index violations become [`AppError::Conflict`]; everything else is
/// a [`AppError::Database`] failure.
#[must_use]
pub fn db_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_errors_map_to_database() {
        let err = db_error(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(msg) if msg.contains("boom")));
    }

    #[test]
    fn test_record_not_found_is_not_a_conflict() {
        let err = db_error(DbErr::RecordNotFound("post".to_string()));
        assert!(!matches!(err, AppError::Conflict(_)));
    }
}
