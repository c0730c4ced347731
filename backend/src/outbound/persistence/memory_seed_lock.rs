//! Async advisory locks for the in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{AdvisoryLockId, SeedLockError, SeedLockGuard, SeedLockManager};

/// In-memory advisory lock registry.
///
/// Each lock id maps to one `tokio::sync::Mutex`; holding the owned guard
/// inside the returned [`SeedLockGuard`] keeps the lock until the guard is
/// dropped, matching the release-on-drop contract of the port.
#[derive(Debug, Default)]
pub struct MemorySeedLockManager {
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl MemorySeedLockManager {
    /// Create an empty lock registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SeedLockManager for MemorySeedLockManager {
    async fn acquire(&self, lock: AdvisoryLockId) -> Result<SeedLockGuard, SeedLockError> {
        // The registry mutex is released before awaiting the lock itself.
        let entry = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|_| SeedLockError::connection("lock registry mutex poisoned"))?;
            Arc::clone(locks.entry(lock.value()).or_default())
        };
        let guard = entry.lock_owned().await;
        Ok(SeedLockGuard::new(Box::new(guard)))
    }
}

#[cfg(test)]
#[path = "memory_seed_lock_tests.rs"]
mod tests;
