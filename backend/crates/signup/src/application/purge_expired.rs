//! Purge Expired Use Case
//!
//! Passive eviction of pending registrations long past their window.
//! Records are kept for the retention period after expiry so a late
//! verification still reports "expired" rather than "not found".

use std::sync::Arc;

use platform::clock::Clock;

use crate::application::config::SignupConfig;
use crate::domain::repository::PendingRegistrationStore;
use crate::error::SignupResult;

pub struct PurgeExpiredUseCase<S>
where
    S: PendingRegistrationStore,
{
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: Arc<SignupConfig>,
}

impl<S> PurgeExpiredUseCase<S>
where
    S: PendingRegistrationStore,
{
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: Arc<SignupConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Returns the number of records removed
    pub async fn execute(&self) -> SignupResult<u64> {
        let cutoff = self.clock.now() - self.config.pending_retention_secs();
        let purged = self.store.purge_expired(cutoff).await?;
        if purged > 0 {
            tracing::info!(purged, cutoff, "Purged stale pending registrations");
        }
        Ok(purged)
    }
}
