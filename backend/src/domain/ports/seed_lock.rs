//! Port abstraction for cross-process seed locks.
//!
//! Seeding runs on every replica at startup, so the coordinator serialises
//! each dataset behind a numeric advisory lock. The guard owns whatever the
//! adapter needs to keep the lock held (a connection, an owned mutex guard)
//! and releases it when dropped, including on early return and panic unwind.

use async_trait::async_trait;
use std::any::Any;
use std::fmt;

use super::define_port_error;

define_port_error! {
    /// Errors raised by seed lock adapters.
    pub enum SeedLockError {
        /// Lock backend could not be reached.
        Connection { message: String } => "seed lock connection failed: {message}",
        /// The lock could not be taken.
        Acquire { message: String } => "seed lock acquisition failed: {message}",
    }
}

/// Numeric identity of one advisory lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvisoryLockId(i64);

impl AdvisoryLockId {
    /// Wrap a raw lock number.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw lock number.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AdvisoryLockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Held advisory lock. Dropping it releases the lock.
pub struct SeedLockGuard {
    _token: Box<dyn Any + Send>,
}

impl SeedLockGuard {
    /// Wrap an adapter token whose `Drop` releases the lock.
    #[must_use]
    pub fn new(token: Box<dyn Any + Send>) -> Self {
        Self { _token: token }
    }
}

impl fmt::Debug for SeedLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedLockGuard").finish_non_exhaustive()
    }
}

/// Port for advisory lock acquisition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedLockManager: Send + Sync {
    /// Block until `lock` is held, then return its guard.
    async fn acquire(&self, lock: AdvisoryLockId) -> Result<SeedLockGuard, SeedLockError>;
}

/// Fixture implementation whose locks are free and uncontended.
#[derive(Debug, Default)]
pub struct FixtureSeedLockManager;

#[async_trait]
impl SeedLockManager for FixtureSeedLockManager {
    async fn acquire(&self, _lock: AdvisoryLockId) -> Result<SeedLockGuard, SeedLockError> {
        Ok(SeedLockGuard::new(Box::new(())))
    }
}
