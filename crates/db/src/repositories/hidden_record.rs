//! Hidden record repository (the store behind both moderation and suspension).

use std::sync::Arc;

use chrono::Utc;
use shroud_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;

use crate::entities::{
    hidden_record, hidden_record_parent, ContentType, HiddenRecord, HiddenRecordParent,
    HideSource,
};

/// A hide to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHiddenRecord {
    pub source: HideSource,
    pub item_type: ContentType,
    pub item_id: i64,
    /// Viewer who triggered the hide; `None` for admin hides.
    pub user_id: Option<i64>,
    /// Explicit sitewide flag. When `None`, a new row is sitewide iff it has
    /// no `user_id`, and an existing row keeps its flag.
    pub hide_sitewide: Option<bool>,
    /// Parent item whose hide cascaded into this one; `None` for a direct hide.
    pub parent: Option<(ContentType, i64)>,
}

/// Which hidden records to lift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenRecordRemoval {
    pub source: HideSource,
    pub item_type: ContentType,
    pub item_id: i64,
    pub user_id: Option<i64>,
    pub hide_sitewide: Option<bool>,
    /// Parent whose unhide is cascading; only its link is dropped. `None`
    /// lifts the direct hide.
    pub parent: Option<(ContentType, i64)>,
    /// Match rows of every viewer regardless of `user_id` and `hide_sitewide`.
    pub force_all: bool,
}

/// Hidden record repository for database operations.
#[derive(Clone)]
pub struct HiddenRecordRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl HiddenRecordRepository {
    /// Create a new hidden record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find every row recorded for an item.
    pub async fn find_for_item(
        &self,
        source: HideSource,
        item_type: ContentType,
        item_id: i64,
    ) -> AppResult<Vec<hidden_record::Model>> {
        HiddenRecord::find()
            .filter(hidden_record::Column::Source.eq(source))
            .filter(hidden_record::Column::ItemType.eq(item_type))
            .filter(hidden_record::Column::ItemId.eq(item_id))
            .order_by_asc(hidden_record::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the row for an item and viewer (`None` = the admin row).
    pub async fn find_one(
        &self,
        source: HideSource,
        item_type: ContentType,
        item_id: i64,
        user_id: Option<i64>,
    ) -> AppResult<Option<hidden_record::Model>> {
        let user_condition = match user_id {
            Some(id) => hidden_record::Column::UserId.eq(id),
            None => hidden_record::Column::UserId.is_null(),
        };

        HiddenRecord::find()
            .filter(hidden_record::Column::Source.eq(source))
            .filter(hidden_record::Column::ItemType.eq(item_type))
            .filter(hidden_record::Column::ItemId.eq(item_id))
            .filter(user_condition)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a hide, updating the existing row for the same item and viewer.
    ///
    /// A cascaded hide adds a link to its parent. A direct hide on top of a
    /// cascaded row clears `hide_parent`, so the row outlives its parents.
    pub async fn add(&self, record: NewHiddenRecord) -> AppResult<hidden_record::Model> {
        if record.user_id.is_none() && record.hide_sitewide == Some(false) {
            return Err(AppError::BadRequest(
                "A hide without a user must be sitewide".to_string(),
            ));
        }

        let row = self.upsert(&record).await?;
        if let Some(parent) = record.parent {
            self.link_parent(&row.id, parent).await?;
        }
        Ok(row)
    }

    async fn upsert(&self, record: &NewHiddenRecord) -> AppResult<hidden_record::Model> {
        let now = Utc::now();
        let cascaded = record.parent.is_some();

        if let Some(existing) = self
            .find_one(
                record.source,
                record.item_type,
                record.item_id,
                record.user_id,
            )
            .await?
        {
            let hide_parent = existing.hide_parent && cascaded;
            let hide_sitewide = record.hide_sitewide.unwrap_or(existing.hide_sitewide);
            if hide_parent == existing.hide_parent && hide_sitewide == existing.hide_sitewide {
                return Ok(existing);
            }

            debug!(
                item_type = %record.item_type,
                item_id = record.item_id,
                hide_sitewide,
                hide_parent,
                "Updating hidden record"
            );

            let mut model: hidden_record::ActiveModel = existing.into();
            model.hide_sitewide = Set(hide_sitewide);
            model.hide_parent = Set(hide_parent);
            model.updated_at = Set(now.into());
            return model
                .update(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()));
        }

        let model = hidden_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            source: Set(record.source),
            item_type: Set(record.item_type),
            item_id: Set(record.item_id),
            user_id: Set(record.user_id),
            hide_sitewide: Set(record.hide_sitewide.unwrap_or(record.user_id.is_none())),
            hide_parent: Set(cascaded),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Lift hides, returning how many rows were deleted.
    ///
    /// A row is deleted only once it has neither a direct hide nor a parent
    /// link left. Lifting the direct hide of a row that still has parents
    /// turns it into a purely cascaded row.
    pub async fn remove(&self, removal: HiddenRecordRemoval) -> AppResult<u64> {
        let mut condition = Condition::all()
            .add(hidden_record::Column::Source.eq(removal.source))
            .add(hidden_record::Column::ItemType.eq(removal.item_type))
            .add(hidden_record::Column::ItemId.eq(removal.item_id));

        if !removal.force_all {
            condition = condition.add(match removal.user_id {
                Some(id) => hidden_record::Column::UserId.eq(id),
                None => hidden_record::Column::UserId.is_null(),
            });
            if let Some(sitewide) = removal.hide_sitewide {
                condition = condition.add(hidden_record::Column::HideSitewide.eq(sitewide));
            }
        }

        let rows = HiddenRecord::find()
            .filter(condition)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut removed = 0;
        for row in rows {
            let direct_hide_left = match removal.parent {
                Some(parent) => {
                    self.unlink_parent(&row.id, parent).await?;
                    !row.hide_parent
                }
                // Nothing direct to lift on a purely cascaded row.
                None if row.hide_parent => continue,
                None => false,
            };

            if direct_hide_left {
                continue;
            }
            let parents_left = self.parent_count(&row.id).await?;
            if parents_left > 0 {
                if removal.parent.is_none() {
                    debug!(record_id = %row.id, parents_left, "Direct hide lifted, parents remain");
                    let mut model: hidden_record::ActiveModel = row.into();
                    model.hide_parent = Set(true);
                    model.updated_at = Set(Utc::now().into());
                    model
                        .update(self.db.as_ref())
                        .await
                        .map_err(|e| AppError::Database(e.to_string()))?;
                }
                continue;
            }

            row.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            removed += 1;
        }

        Ok(removed)
    }

    /// Parents a hidden record was cascaded from.
    pub async fn parents(&self, record_id: &str) -> AppResult<Vec<(ContentType, i64)>> {
        HiddenRecordParent::find()
            .select_only()
            .column(hidden_record_parent::Column::ParentType)
            .column(hidden_record_parent::Column::ParentId)
            .filter(hidden_record_parent::Column::RecordId.eq(record_id))
            .order_by_asc(hidden_record_parent::Column::ParentType)
            .order_by_asc(hidden_record_parent::Column::ParentId)
            .into_tuple::<(ContentType, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn link_parent(&self, record_id: &str, parent: (ContentType, i64)) -> AppResult<()> {
        let (parent_type, parent_id) = parent;
        let linked = HiddenRecordParent::find()
            .filter(hidden_record_parent::Column::RecordId.eq(record_id))
            .filter(hidden_record_parent::Column::ParentType.eq(parent_type))
            .filter(hidden_record_parent::Column::ParentId.eq(parent_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if linked > 0 {
            return Ok(());
        }

        hidden_record_parent::ActiveModel {
            id: Set(self.id_gen.generate()),
            record_id: Set(record_id.to_string()),
            parent_type: Set(parent_type),
            parent_id: Set(parent_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
        .map(|_| ())
        .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn unlink_parent(&self, record_id: &str, parent: (ContentType, i64)) -> AppResult<()> {
        let (parent_type, parent_id) = parent;
        HiddenRecordParent::delete_many()
            .filter(hidden_record_parent::Column::RecordId.eq(record_id))
            .filter(hidden_record_parent::Column::ParentType.eq(parent_type))
            .filter(hidden_record_parent::Column::ParentId.eq(parent_id))
            .exec(self.db.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn parent_count(&self, record_id: &str) -> AppResult<u64> {
        HiddenRecordParent::find()
            .filter(hidden_record_parent::Column::RecordId.eq(record_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of items of a type hidden for every viewer.
    pub async fn sitewide_item_ids(
        &self,
        source: HideSource,
        item_type: ContentType,
    ) -> AppResult<Vec<i64>> {
        HiddenRecord::find()
            .select_only()
            .column(hidden_record::Column::ItemId)
            .filter(hidden_record::Column::Source.eq(source))
            .filter(hidden_record::Column::ItemType.eq(item_type))
            .filter(hidden_record::Column::HideSitewide.eq(true))
            .distinct()
            .order_by_asc(hidden_record::Column::ItemId)
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of items of a type a viewer hid for themselves.
    pub async fn personal_item_ids(
        &self,
        source: HideSource,
        item_type: ContentType,
        user_id: i64,
    ) -> AppResult<Vec<i64>> {
        HiddenRecord::find()
            .select_only()
            .column(hidden_record::Column::ItemId)
            .filter(hidden_record::Column::Source.eq(source))
            .filter(hidden_record::Column::ItemType.eq(item_type))
            .filter(hidden_record::Column::UserId.eq(user_id))
            .filter(hidden_record::Column::HideSitewide.eq(false))
            .distinct()
            .order_by_asc(hidden_record::Column::ItemId)
            .into_tuple::<i64>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an item is hidden for a viewer (`None` = anonymous).
    pub async fn is_hidden_for(
        &self,
        source: HideSource,
        item_type: ContentType,
        item_id: i64,
        viewer_id: Option<i64>,
    ) -> AppResult<bool> {
        let mut visibility = Condition::any().add(hidden_record::Column::HideSitewide.eq(true));
        if let Some(viewer) = viewer_id {
            visibility = visibility.add(hidden_record::Column::UserId.eq(viewer));
        }

        let count = HiddenRecord::find()
            .filter(hidden_record::Column::Source.eq(source))
            .filter(hidden_record::Column::ItemType.eq(item_type))
            .filter(hidden_record::Column::ItemId.eq(item_id))
            .filter(visibility)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TestDatabase;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn sitewide(item_type: ContentType, item_id: i64) -> NewHiddenRecord {
        NewHiddenRecord {
            source: HideSource::Suspend,
            item_type,
            item_id,
            user_id: None,
            hide_sitewide: None,
            parent: None,
        }
    }

    fn cascaded(item_type: ContentType, item_id: i64, parent: (ContentType, i64)) -> NewHiddenRecord {
        NewHiddenRecord {
            parent: Some(parent),
            ..sitewide(item_type, item_id)
        }
    }

    fn removal(item_type: ContentType, item_id: i64) -> HiddenRecordRemoval {
        HiddenRecordRemoval {
            source: HideSource::Suspend,
            item_type,
            item_id,
            user_id: None,
            hide_sitewide: None,
            parent: None,
            force_all: false,
        }
    }

    #[tokio::test]
    async fn test_admin_hide_must_be_sitewide() {
        // Rejected before any query runs.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = HiddenRecordRepository::new(db);

        let result = repo
            .add(NewHiddenRecord {
                hide_sitewide: Some(false),
                ..sitewide(ContentType::Group, 42)
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_add_defaults_sitewide_without_user() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        let admin = repo.add(sitewide(ContentType::Group, 42)).await.unwrap();
        assert!(admin.hide_sitewide);
        assert!(admin.user_id.is_none());

        let personal = repo
            .add(NewHiddenRecord {
                user_id: Some(7),
                ..sitewide(ContentType::Group, 43)
            })
            .await
            .unwrap();
        assert!(!personal.hide_sitewide);

        let ids = repo
            .sitewide_item_ids(HideSource::Suspend, ContentType::Group)
            .await
            .unwrap();
        assert_eq!(ids, vec![42]);

        let mine = repo
            .personal_item_ids(HideSource::Suspend, ContentType::Group, 7)
            .await
            .unwrap();
        assert_eq!(mine, vec![43]);
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        let parent = (ContentType::Activity, 9);
        let first = repo.add(cascaded(ContentType::Activity, 1, parent)).await.unwrap();
        let second = repo.add(cascaded(ContentType::Activity, 1, parent)).await.unwrap();

        assert_eq!(first.id, second.id);
        let rows = repo
            .find_for_item(HideSource::Suspend, ContentType::Activity, 1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(repo.parents(&first.id).await.unwrap(), vec![parent]);
    }

    #[tokio::test]
    async fn test_cascaded_row_lives_until_last_parent_is_unlinked() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        let group = (ContentType::Group, 42);
        let member = (ContentType::Member, 1);
        let row = repo.add(cascaded(ContentType::Forum, 8, group)).await.unwrap();
        repo.add(cascaded(ContentType::Forum, 8, member)).await.unwrap();
        assert!(row.hide_parent);
        assert_eq!(repo.parents(&row.id).await.unwrap(), vec![group, member]);

        let removed = repo
            .remove(HiddenRecordRemoval {
                parent: Some(group),
                ..removal(ContentType::Forum, 8)
            })
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(
            repo.is_hidden_for(HideSource::Suspend, ContentType::Forum, 8, None)
                .await
                .unwrap()
        );
        assert_eq!(repo.parents(&row.id).await.unwrap(), vec![member]);

        let removed = repo
            .remove(HiddenRecordRemoval {
                parent: Some(member),
                ..removal(ContentType::Forum, 8)
            })
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(
            repo.find_for_item(HideSource::Suspend, ContentType::Forum, 8)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_direct_hide_outlives_parent_unhide() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        let forum = (ContentType::Forum, 5);
        repo.add(cascaded(ContentType::Topic, 50, forum)).await.unwrap();
        let direct = repo.add(sitewide(ContentType::Topic, 50)).await.unwrap();
        assert!(!direct.hide_parent);

        let removed = repo
            .remove(HiddenRecordRemoval {
                parent: Some(forum),
                force_all: true,
                ..removal(ContentType::Topic, 50)
            })
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert!(repo.parents(&direct.id).await.unwrap().is_empty());
        assert!(
            repo.is_hidden_for(HideSource::Suspend, ContentType::Topic, 50, None)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_lifting_direct_hide_keeps_cascaded_row() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        let forum = (ContentType::Forum, 5);
        repo.add(cascaded(ContentType::Topic, 51, forum)).await.unwrap();
        repo.add(sitewide(ContentType::Topic, 51)).await.unwrap();

        let removed = repo.remove(removal(ContentType::Topic, 51)).await.unwrap();
        assert_eq!(removed, 0);

        let row = repo
            .find_one(HideSource::Suspend, ContentType::Topic, 51, None)
            .await
            .unwrap()
            .unwrap();
        assert!(row.hide_parent);

        // A second direct unhide has nothing left to lift.
        assert_eq!(repo.remove(removal(ContentType::Topic, 51)).await.unwrap(), 0);
        assert!(
            repo.find_one(HideSource::Suspend, ContentType::Topic, 51, None)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_remove_scopes_to_viewer_unless_forced() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        repo.add(sitewide(ContentType::Topic, 9)).await.unwrap();
        repo.add(NewHiddenRecord {
            user_id: Some(3),
            ..sitewide(ContentType::Topic, 9)
        })
        .await
        .unwrap();

        let removed = repo
            .remove(HiddenRecordRemoval {
                user_id: Some(3),
                ..removal(ContentType::Topic, 9)
            })
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(
            repo.is_hidden_for(HideSource::Suspend, ContentType::Topic, 9, Some(3))
                .await
                .unwrap()
        );

        repo.add(NewHiddenRecord {
            user_id: Some(3),
            ..sitewide(ContentType::Topic, 9)
        })
        .await
        .unwrap();
        let removed = repo
            .remove(HiddenRecordRemoval {
                force_all: true,
                ..removal(ContentType::Topic, 9)
            })
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(
            !repo
                .is_hidden_for(HideSource::Suspend, ContentType::Topic, 9, Some(3))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_personal_hide_only_applies_to_its_viewer() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        repo.add(NewHiddenRecord {
            source: HideSource::Moderation,
            user_id: Some(11),
            ..sitewide(ContentType::Member, 20)
        })
        .await
        .unwrap();

        for (viewer, expected) in [(Some(11), true), (Some(12), false), (None, false)] {
            let hidden = repo
                .is_hidden_for(HideSource::Moderation, ContentType::Member, 20, viewer)
                .await
                .unwrap();
            assert_eq!(hidden, expected, "viewer {viewer:?}");
        }
    }

    #[tokio::test]
    async fn test_sources_are_independent() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = HiddenRecordRepository::new(db.connection());

        repo.add(sitewide(ContentType::Reply, 4)).await.unwrap();

        let moderation = repo
            .sitewide_item_ids(HideSource::Moderation, ContentType::Reply)
            .await
            .unwrap();
        assert!(moderation.is_empty());
    }
}
