//! Opening the database handle used by the orchestrator.

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use tracing::info;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};

/// Connects according to `config` and prepares the schema.
///
/// On SQLite, foreign-key enforcement is switched on so that deleting a
/// bundle removes its paths and places. With the `migration` feature the
/// trail tables are created if they are missing.
pub async fn connect(config: &StoreConfig) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .sqlx_logging(config.sqlx_logging);
    if let Some(idle) = config.idle_timeout {
        opt.idle_timeout(idle);
    }
    if let Some(lifetime) = config.max_lifetime {
        opt.max_lifetime(lifetime);
    }

    let db = Database::connect(opt)
        .await
        .map_err(|e| StoreError::storage("Failed to connect to database", e))?;

    let backend = db.get_database_backend();
    info!(?backend, "Connected to database");

    if backend == DbBackend::Sqlite {
        db.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .map_err(|e| StoreError::storage("Failed to enable foreign key checks", e))?;
    }

    #[cfg(feature = "migration")]
    {
        use sea_orm_migration::MigratorTrait;

        crate::migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StoreError::storage("Failed to create database tables", e))?;
    }

    Ok(db)
}
