//! Moderation service: sitewide hides of reported content and personal
//! member blocks.

use std::sync::Arc;

use shroud_common::{AppError, AppResult};
use shroud_db::entities::{ContentType, HideSource, hidden_record};
use shroud_db::repositories::{HiddenRecordRemoval, NewHiddenRecord, UserRepository};
use tracing::info;

use super::ensure_registered;
use crate::query::IdSet;
use crate::registry::QueryFilterRegistry;

/// Moderation service for hiding content and blocking members.
#[derive(Clone)]
pub struct ModerationService {
    registry: Arc<QueryFilterRegistry>,
    user_repo: UserRepository,
}

impl ModerationService {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(registry: Arc<QueryFilterRegistry>, user_repo: UserRepository) -> Self {
        Self {
            registry,
            user_repo,
        }
    }

    /// Hide an item for every viewer.
    pub async fn hide_item(
        &self,
        content_type: ContentType,
        item_id: i64,
    ) -> AppResult<hidden_record::Model> {
        ensure_registered(&self.registry, HideSource::Moderation, content_type)?;

        info!(%content_type, item_id, "Hiding item");
        self.registry
            .hidden_records()
            .add(NewHiddenRecord {
                source: HideSource::Moderation,
                item_type: content_type,
                item_id,
                user_id: None,
                hide_sitewide: Some(true),
                parent: None,
            })
            .await
    }

    /// Lift a sitewide hide. Returns whether anything was hidden.
    pub async fn unhide_item(&self, content_type: ContentType, item_id: i64) -> AppResult<bool> {
        ensure_registered(&self.registry, HideSource::Moderation, content_type)?;

        info!(%content_type, item_id, "Unhiding item");
        let removed = self
            .registry
            .hidden_records()
            .remove(HiddenRecordRemoval {
                source: HideSource::Moderation,
                item_type: content_type,
                item_id,
                user_id: None,
                hide_sitewide: None,
                parent: None,
                force_all: false,
            })
            .await?;

        Ok(removed > 0)
    }

    /// Block a member for one viewer.
    pub async fn block_member(
        &self,
        viewer_id: i64,
        member_id: i64,
    ) -> AppResult<hidden_record::Model> {
        if viewer_id == member_id {
            return Err(AppError::BadRequest("Cannot block yourself".to_string()));
        }

        // Check target member exists
        self.user_repo.get_by_id(member_id).await?;

        info!(viewer_id, member_id, "Blocking member");
        self.registry
            .hidden_records()
            .add(NewHiddenRecord {
                source: HideSource::Moderation,
                item_type: ContentType::Member,
                item_id: member_id,
                user_id: Some(viewer_id),
                hide_sitewide: Some(false),
                parent: None,
            })
            .await
    }

    /// Remove a viewer's block. Returns whether the member was blocked.
    pub async fn unblock_member(&self, viewer_id: i64, member_id: i64) -> AppResult<bool> {
        info!(viewer_id, member_id, "Unblocking member");
        let removed = self
            .registry
            .hidden_records()
            .remove(HiddenRecordRemoval {
                source: HideSource::Moderation,
                item_type: ContentType::Member,
                item_id: member_id,
                user_id: Some(viewer_id),
                hide_sitewide: Some(false),
                parent: None,
                force_all: false,
            })
            .await?;

        Ok(removed > 0)
    }

    /// Items of a type hidden for a viewer, including those hidden because
    /// something they belong to is.
    pub async fn hidden_ids(&self, content_type: ContentType, viewer_id: Option<i64>) -> IdSet {
        self.registry
            .hidden_ids(HideSource::Moderation, content_type, viewer_id)
            .await
    }

    /// Whether an item is hidden for a viewer.
    pub async fn is_hidden(
        &self,
        content_type: ContentType,
        item_id: i64,
        viewer_id: Option<i64>,
    ) -> bool {
        self.hidden_ids(content_type, viewer_id)
            .await
            .contains(&item_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::modules::ModuleAvailability;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service(modules: ModuleAvailability) -> ModerationService {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let registry = QueryFilterRegistry::with_defaults(db.clone(), modules);
        ModerationService::new(Arc::new(registry), UserRepository::new(db))
    }

    #[tokio::test]
    async fn test_cannot_block_yourself() {
        let result = service(ModuleAvailability::all()).block_member(3, 3).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_hide_inactive_module_is_rejected() {
        let result = service(ModuleAvailability::members_only())
            .hide_item(ContentType::Group, 42)
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("groups")),
            other => panic!("Expected BadRequest, got {other:?}"),
        }
    }
}
