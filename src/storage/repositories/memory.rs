//! In-memory session store
//!
//! Process-local storage for development and tests. Sessions are lost on
//! restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::session::SessionStore;
use crate::auth::session::{Session, SessionToken};
use crate::errors::{Error, Result};

/// `DashMap`-backed session store keyed by token digest
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: Session) -> Result<()> {
        match self.sessions.entry(session.token.digest()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                Err(Error::conflict("Session token already exists", "session"))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(session);
                Ok(())
            }
        }
    }

    async fn lookup(&self, token: &SessionToken) -> Result<Option<Session>> {
        let now = Utc::now();
        Ok(self
            .sessions
            .get(&token.digest())
            .filter(|session| !session.is_expired_at(now))
            .map(|session| session.clone()))
    }

    async fn delete(&self, token: &SessionToken) -> Result<bool> {
        Ok(self.sessions.remove(&token.digest()).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before.saturating_sub(self.sessions.len()) as u64)
    }
}
