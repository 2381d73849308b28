//! Session repository
//!
//! The [`SessionStore`] trait is the seam between the HTTP layer and session
//! persistence. [`SqlxSessionStore`] keeps sessions in SQLite keyed by the
//! token digest so raw tokens never reach the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::auth::session::{Session, SessionToken};
use crate::domain::UserId;
use crate::errors::{Error, Result};
use crate::storage::DbPool;

/// Persistence for session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session. Fails with a conflict if the token is already known.
    async fn create(&self, session: Session) -> Result<()>;

    /// Find a live session by token. Expired sessions are reported as absent.
    async fn lookup(&self, token: &SessionToken) -> Result<Option<Session>>;

    /// Remove the session for `token`, reporting whether one existed.
    async fn delete(&self, token: &SessionToken) -> Result<bool>;

    /// Remove every session that expired at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64>;
}

#[derive(Debug, Clone, FromRow)]
struct SessionRow {
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone)]
pub struct SqlxSessionStore {
    pool: DbPool,
}

impl SqlxSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_model(token: &SessionToken, row: SessionRow) -> Result<Session> {
        Ok(Session {
            token: token.clone(),
            user_id: UserId::from_string(row.user_id),
            created_at: from_millis(row.created_at)?,
            expires_at: from_millis(row.expires_at)?,
        })
    }
}

fn from_millis(value: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| Error::internal(format!("Stored session timestamp out of range: {}", value)))
}

#[async_trait]
impl SessionStore for SqlxSessionStore {
    #[tracing::instrument(skip_all, fields(user_id = %session.user_id))]
    async fn create(&self, session: Session) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(session.token.digest())
        .bind(session.user_id.as_str())
        .bind(session.created_at.timestamp_millis())
        .bind(session.expires_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(Error::conflict("Session token already exists", "session"))
            }
            Err(err) => Err(Error::database(err, "Failed to insert session")),
        }
    }

    async fn lookup(&self, token: &SessionToken) -> Result<Option<Session>> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT user_id, created_at, expires_at FROM sessions WHERE token_hash = $1 AND expires_at > $2",
        )
        .bind(token.digest())
        .bind(Utc::now().timestamp_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to fetch session"))?;

        row.map(|row| Self::to_model(token, row)).transpose()
    }

    async fn delete(&self, token: &SessionToken) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token.digest())
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete session"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to purge expired sessions"))?;

        Ok(result.rows_affected())
    }
}
