//! Create `hidden_record_parent` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HiddenRecordParent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HiddenRecordParent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HiddenRecordParent::RecordId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HiddenRecordParent::ParentType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HiddenRecordParent::ParentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HiddenRecordParent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hidden_record_parent_record")
                            .from(HiddenRecordParent::Table, HiddenRecordParent::RecordId)
                            .to(HiddenRecord::Table, HiddenRecord::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one link per record and parent
        manager
            .create_index(
                Index::create()
                    .name("idx_hidden_record_parent_link")
                    .table(HiddenRecordParent::Table)
                    .col(HiddenRecordParent::RecordId)
                    .col(HiddenRecordParent::ParentType)
                    .col(HiddenRecordParent::ParentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HiddenRecordParent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum HiddenRecordParent {
    Table,
    Id,
    RecordId,
    ParentType,
    ParentId,
    CreatedAt,
}

#[derive(Iden)]
enum HiddenRecord {
    Table,
    Id,
}
