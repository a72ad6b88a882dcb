//! Create `hidden_record` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HiddenRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HiddenRecord::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HiddenRecord::Source).string_len(16).not_null())
                    .col(ColumnDef::new(HiddenRecord::ItemType).string_len(20).not_null())
                    .col(ColumnDef::new(HiddenRecord::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(HiddenRecord::UserId).big_integer())
                    .col(
                        ColumnDef::new(HiddenRecord::HideSitewide)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HiddenRecord::HideParent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HiddenRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HiddenRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (item_type, item_id, source) - the exclusion join key
        manager
            .create_index(
                Index::create()
                    .name("idx_hidden_record_item")
                    .table(HiddenRecord::Table)
                    .col(HiddenRecord::ItemType)
                    .col(HiddenRecord::ItemId)
                    .col(HiddenRecord::Source)
                    .to_owned(),
            )
            .await?;

        // Index: (source, item_type, hide_sitewide) - sitewide hidden ID sets
        manager
            .create_index(
                Index::create()
                    .name("idx_hidden_record_sitewide")
                    .table(HiddenRecord::Table)
                    .col(HiddenRecord::Source)
                    .col(HiddenRecord::ItemType)
                    .col(HiddenRecord::HideSitewide)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HiddenRecord::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HiddenRecord {
    Table,
    Id,
    Source,
    ItemType,
    ItemId,
    UserId,
    HideSitewide,
    HideParent,
    CreatedAt,
    UpdatedAt,
}
