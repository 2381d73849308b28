//! Background maintenance routines for sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::errors::Result;
use crate::observability::metrics;
use crate::storage::SessionStore;

#[derive(Clone)]
pub struct SessionCleanupService {
    store: Arc<dyn SessionStore>,
}

impl SessionCleanupService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Remove every expired session, returning how many were dropped.
    pub async fn run_once(&self) -> Result<u64> {
        let purged = self.store.purge_expired(Utc::now()).await?;
        if purged > 0 {
            tracing::info!(purged, "Purged expired sessions");
        }
        metrics::record_sessions_purged(purged).await;
        Ok(purged)
    }

    /// Run [`Self::run_once`] on a fixed interval until the task is aborted.
    ///
    /// Failures are logged and the sweep continues on the next tick.
    pub fn spawn(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.run_once().await {
                    tracing::error!(error = %err, "Session cleanup sweep failed");
                }
            }
        })
    }
}
