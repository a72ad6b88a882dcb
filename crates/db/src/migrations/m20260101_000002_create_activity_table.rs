//! Create activity table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activity::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activity::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activity::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Activity::Component).string_len(64).not_null())
                    .col(ColumnDef::new(Activity::Type).string_len(64).not_null())
                    .col(ColumnDef::new(Activity::ItemId).big_integer().not_null())
                    .col(ColumnDef::new(Activity::SecondaryItemId).big_integer())
                    .col(ColumnDef::new(Activity::Content).text().not_null())
                    .col(
                        ColumnDef::new(Activity::HideSitewide)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Activity::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_user")
                            .from(Activity::Table, Activity::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (member suspension cascade)
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_user_id")
                    .table(Activity::Table)
                    .col(Activity::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (component, item_id) (group and forum activity lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_component_item_id")
                    .table(Activity::Table)
                    .col(Activity::Component)
                    .col(Activity::ItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Activity::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Activity {
    Table,
    Id,
    UserId,
    Component,
    Type,
    ItemId,
    SecondaryItemId,
    Content,
    HideSitewide,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
