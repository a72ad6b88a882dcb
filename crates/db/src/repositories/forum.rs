//! Forum repository (forums, topics and replies).

use std::sync::Arc;

use crate::entities::{forum, forum_reply, forum_topic};
use shroud_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection};

/// Repository for forum operations.
#[derive(Clone)]
pub struct ForumRepository {
    db: Arc<DatabaseConnection>,
}

impl ForumRepository {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new forum.
    pub async fn create_forum(&self, model: forum::ActiveModel) -> AppResult<forum::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new topic.
    pub async fn create_topic(
        &self,
        model: forum_topic::ActiveModel,
    ) -> AppResult<forum_topic::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reply.
    pub async fn create_reply(
        &self,
        model: forum_reply::ActiveModel,
    ) -> AppResult<forum_reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
