//! Expired session sweep.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use parley_core::result::AppResult;

use crate::store::AuthStore;

/// Handles periodic removal of expired account and guest sessions.
///
/// Expiry is otherwise a query-time check; the sweep reclaims the records.
#[derive(Clone)]
pub struct SessionSweeper {
    /// Session persistence.
    store: Arc<dyn AuthStore>,
}

impl std::fmt::Debug for SessionSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSweeper").finish()
    }
}

impl SessionSweeper {
    /// Creates a sweeper over the given store.
    pub fn new(store: Arc<dyn AuthStore>) -> Self {
        Self { store }
    }

    /// Runs one sweep cycle.
    ///
    /// Returns the number of records removed. Per-item failures are logged
    /// and skipped so one bad record does not stall the sweep.
    pub async fn run_sweep(&self) -> AppResult<u32> {
        let now = Utc::now();
        let expired = self.store.expired_sessions(now).await?;
        let mut removed = 0u32;

        for session_id in &expired {
            match self.store.delete_session(session_id).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    error!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to remove expired session"
                    );
                }
            }
        }

        let guests = self.store.delete_expired_guests(now).await?;
        removed += guests;

        if removed > 0 {
            info!(removed = removed, "Session sweep completed");
        }
        Ok(removed)
    }
}
