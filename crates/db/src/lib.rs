//! Database layer for shroud: content entities, the hidden record store,
//! migrations and repositories.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use shroud_common::{AppError, Config};
use std::time::Duration;
use tracing::log::LevelFilter;
use tracing::{debug, info};

use crate::migrations::Migrator;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    debug!(
        max_connections = config.database.max_connections,
        min_connections = config.database.min_connections,
        "Connecting to database"
    );
    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Apply pending migrations for the content and hidden record tables.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    let pending = Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if pending.is_empty() {
        debug!("Schema is up to date");
        return Ok(());
    }

    info!(
        count = pending.len(),
        migrations = ?pending.iter().map(|m| m.name().to_string()).collect::<Vec<_>>(),
        "Applying migrations"
    );
    Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
