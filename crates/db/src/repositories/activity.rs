//! Activity log repository.

use std::sync::Arc;

use crate::{db_error, entities::activity};
use quill_common::AppResult;
use sea_orm::{ActiveModelTrait, DatabaseConnection};

/// Activity repository for database operations.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an activity row.
    pub async fn create(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }
}
