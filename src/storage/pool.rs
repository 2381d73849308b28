//! # Database Connection Pool Management
//!
//! SQLite pool creation for the session store.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::config::DatabaseConfig;
use crate::errors::{Error, Result};

/// Type alias for the database connection pool
pub type DbPool = Pool<Sqlite>;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a database connection pool with the specified configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    validate_config(config)?;

    let connect_options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| {
            Error::database(e, format!("Invalid SQLite connection string: {}", config.url))
        })?
        .create_if_missing(true)
        .busy_timeout(SQLITE_BUSY_TIMEOUT);

    let in_memory = config.is_in_memory();

    // A private in-memory database lives and dies with its single connection.
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        ensure_parent_dir(connect_options.get_filename()).await?;
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let connect_options = if in_memory {
        connect_options
    } else {
        connect_options.journal_mode(SqliteJournalMode::Wal)
    };

    let pool = pool_options
        .acquire_timeout(config.connect_timeout())
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, url = %config.url, "Failed to create SQLite database pool");
            Error::database(e, format!("Failed to connect to database: {}", config.url))
        })?;

    tracing::info!(
        url = %config.url,
        max_connections = if in_memory { 1 } else { config.max_connections },
        connect_timeout_ms = config.connect_timeout().as_millis() as u64,
        "Database connection pool created"
    );

    if config.auto_migrate {
        tracing::info!("Auto-migration enabled, running database migrations");
        crate::storage::run_migrations(&pool).await?;
    }

    Ok(pool)
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await.map_err(|e| Error::Io {
                source: e,
                context: format!("Failed to create database directory {}", parent.display()),
            })
        }
        _ => Ok(()),
    }
}

/// Validate database configuration
fn validate_config(config: &DatabaseConfig) -> Result<()> {
    if config.max_connections == 0 {
        return Err(Error::validation("max_connections must be greater than 0"));
    }

    if config.url.is_empty() {
        return Err(Error::validation("database URL cannot be empty"));
    }

    if !config.is_sqlite() {
        return Err(Error::validation("database URL must start with 'sqlite:'"));
    }

    Ok(())
}
