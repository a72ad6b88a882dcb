//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_activity_table;
mod m20260101_000003_create_groups_table;
mod m20260101_000004_create_forum_tables;
mod m20260101_000005_create_hidden_record_table;
mod m20260101_000006_create_hidden_record_parent_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_activity_table::Migration),
            Box::new(m20260101_000003_create_groups_table::Migration),
            Box::new(m20260101_000004_create_forum_tables::Migration),
            Box::new(m20260101_000005_create_hidden_record_table::Migration),
            Box::new(m20260101_000006_create_hidden_record_parent_table::Migration),
        ]
    }
}
