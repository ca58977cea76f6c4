//! Shared helpers for service unit tests.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use sea_orm::{DatabaseConnection, Transaction};

/// Statements the mock connection recorded.
///
/// Every service built over `db` must be dropped first.
pub fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
    Arc::try_unwrap(db)
        .ok()
        .expect("mock connection is still shared")
        .into_transaction_log()
}

/// [`transaction_log`] rendered with `Debug`, for substring checks.
pub fn transaction_log_text(db: Arc<DatabaseConnection>) -> String {
    format!("{:?}", transaction_log(db))
}
