//! Suspend service: hides and unhides with cascade into related content.

use std::sync::Arc;

use shroud_common::AppResult;
use shroud_db::entities::{ContentType, HideSource};
use shroud_db::repositories::UserRepository;
use tracing::info;

use super::inactive;
use crate::adapter::SuspendArgs;
use crate::registry::QueryFilterRegistry;

/// Suspend service dispatching hides to the suspend adapter of each type.
#[derive(Clone)]
pub struct SuspendService {
    registry: Arc<QueryFilterRegistry>,
    user_repo: UserRepository,
}

impl SuspendService {
    /// Create a new suspend service.
    #[must_use]
    pub const fn new(registry: Arc<QueryFilterRegistry>, user_repo: UserRepository) -> Self {
        Self {
            registry,
            user_repo,
        }
    }

    /// Hide an item and everything related to it.
    ///
    /// `hide_sitewide` is only recorded when given; otherwise admin hides
    /// are sitewide and hides carrying a user are personal.
    pub async fn hide(
        &self,
        content_type: ContentType,
        item_id: i64,
        hide_sitewide: Option<bool>,
        args: SuspendArgs,
    ) -> AppResult<()> {
        let adapter = self
            .registry
            .suspend_adapter(content_type)
            .ok_or_else(|| inactive(content_type))?;

        info!(%content_type, item_id, ?hide_sitewide, user_id = ?args.user_id, "Hiding item");
        adapter
            .manage_hidden(item_id, hide_sitewide, &args, &self.registry)
            .await
    }

    /// Unhide an item and everything its hide cascaded into.
    ///
    /// With `force_all`, every hidden record of each item is removed,
    /// whoever it was recorded for.
    pub async fn unhide(
        &self,
        content_type: ContentType,
        item_id: i64,
        hide_sitewide: Option<bool>,
        force_all: bool,
        args: SuspendArgs,
    ) -> AppResult<()> {
        let adapter = self
            .registry
            .suspend_adapter(content_type)
            .ok_or_else(|| inactive(content_type))?;

        info!(%content_type, item_id, force_all, user_id = ?args.user_id, "Unhiding item");
        adapter
            .manage_unhidden(item_id, hide_sitewide, force_all, &args, &self.registry)
            .await
    }

    /// Suspend a member and hide everything they posted or created.
    pub async fn suspend_member(&self, member_id: i64) -> AppResult<()> {
        // Check target member exists
        self.user_repo.get_by_id(member_id).await?;

        self.hide(ContentType::Member, member_id, None, SuspendArgs::default())
            .await
    }

    /// Lift a member's suspension.
    pub async fn unsuspend_member(&self, member_id: i64) -> AppResult<()> {
        self.unhide(
            ContentType::Member,
            member_id,
            None,
            false,
            SuspendArgs::default(),
        )
        .await
    }

    /// Check if a member is suspended.
    pub async fn is_suspended(&self, member_id: i64) -> AppResult<bool> {
        self.registry
            .hidden_records()
            .is_hidden_for(HideSource::Suspend, ContentType::Member, member_id, None)
            .await
    }
}
