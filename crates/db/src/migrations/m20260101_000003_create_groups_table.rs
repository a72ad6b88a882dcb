//! Create groups table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::CreatorId).big_integer().not_null())
                    .col(ColumnDef::new(Groups::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Groups::Status)
                            .string_len(20)
                            .not_null()
                            .default("public"),
                    )
                    .col(ColumnDef::new(Groups::ForumId).big_integer())
                    .col(
                        ColumnDef::new(Groups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_groups_creator")
                            .from(Groups::Table, Groups::CreatorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: creator_id (groups created by a suspended member)
        manager
            .create_index(
                Index::create()
                    .name("idx_groups_creator_id")
                    .table(Groups::Table)
                    .col(Groups::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Groups::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    CreatorId,
    Name,
    Status,
    ForumId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
