//! Create forum, `forum_topic`, and `forum_reply` tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create forum table
        manager
            .create_table(
                Table::create()
                    .table(Forum::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Forum::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Forum::GroupId).big_integer())
                    .col(ColumnDef::new(Forum::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Forum::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Forum::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_author")
                            .from(Forum::Table, Forum::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_forum_group_id")
                    .table(Forum::Table)
                    .col(Forum::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create forum_topic table
        manager
            .create_table(
                Table::create()
                    .table(ForumTopic::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumTopic::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumTopic::ForumId).big_integer().not_null())
                    .col(ColumnDef::new(ForumTopic::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(ForumTopic::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(ForumTopic::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_topic_forum")
                            .from(ForumTopic::Table, ForumTopic::ForumId)
                            .to(Forum::Table, Forum::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_topic_author")
                            .from(ForumTopic::Table, ForumTopic::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_forum_topic_forum_id")
                    .table(ForumTopic::Table)
                    .col(ForumTopic::ForumId)
                    .to_owned(),
            )
            .await?;

        // Create forum_reply table
        manager
            .create_table(
                Table::create()
                    .table(ForumReply::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumReply::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ForumReply::TopicId).big_integer().not_null())
                    .col(ColumnDef::new(ForumReply::ForumId).big_integer().not_null())
                    .col(ColumnDef::new(ForumReply::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(ForumReply::Content).text().not_null())
                    .col(
                        ColumnDef::new(ForumReply::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_reply_topic")
                            .from(ForumReply::Table, ForumReply::TopicId)
                            .to(ForumTopic::Table, ForumTopic::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forum_reply_author")
                            .from(ForumReply::Table, ForumReply::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_forum_reply_topic_id")
                    .table(ForumReply::Table)
                    .col(ForumReply::TopicId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ForumReply::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumTopic::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Forum::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Forum {
    Table,
    Id,
    GroupId,
    AuthorId,
    Title,
    CreatedAt,
}

#[derive(Iden)]
enum ForumTopic {
    Table,
    Id,
    ForumId,
    AuthorId,
    Title,
    CreatedAt,
}

#[derive(Iden)]
enum ForumReply {
    Table,
    Id,
    TopicId,
    ForumId,
    AuthorId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
