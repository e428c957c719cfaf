//! Per-Identity Locks
//!
//! Serializes registration and verification for the same email address.
//! Different identities never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::value_object::email::Email;

/// Table of async mutexes keyed by identity
///
/// An entry lives only while someone holds or waits for it.
#[derive(Debug, Default)]
pub struct IdentityLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `identity`
    pub async fn lock(&self, identity: &Email) -> IdentityGuard<'_> {
        let key = identity.as_str().to_string();
        // The shard lock must be released before awaiting the mutex
        let mutex = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = mutex.lock_owned().await;

        IdentityGuard {
            locks: self,
            key,
            guard: Some(guard),
        }
    }

    /// Number of identities currently locked or awaited
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock for one identity; released on drop
pub struct IdentityGuard<'a> {
    locks: &'a IdentityLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still references the mutex: nobody holds or waits for it
        self.locks
            .locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
