//! # Storage and Persistence
//!
//! Database connectivity and the session store implementations.

pub mod pool;
pub mod repositories;

use std::sync::Arc;

pub use crate::config::DatabaseConfig;
use crate::config::{SessionConfig, SessionStoreBackend};

pub use pool::{create_pool, DbPool};
pub use repositories::{InMemorySessionStore, SessionStore, SqlxSessionStore};

use crate::errors::{Error, Result};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Run embedded database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR.run(pool).await.map_err(Error::from)?;
    tracing::info!(migrations = MIGRATOR.iter().count(), "Database migrations applied");
    Ok(())
}

/// Build the session store selected by configuration
pub async fn session_store_from_config(
    session: &SessionConfig,
    database: &DatabaseConfig,
) -> Result<Arc<dyn SessionStore>> {
    match session.store {
        SessionStoreBackend::Memory => {
            tracing::warn!("Using in-memory session store; sessions are lost on restart");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
        SessionStoreBackend::Sqlite => {
            let pool = create_pool(database).await?;
            check_connection(&pool).await?;
            tracing::info!(url = %database.url, "Session store connected");
            Ok(Arc::new(SqlxSessionStore::new(pool)))
        }
    }
}

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(Error::from)?;
    Ok(())
}
