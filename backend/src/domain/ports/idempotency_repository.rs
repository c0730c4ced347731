//! Port abstraction for recording idempotency keys.
//!
//! Adapters back [`IdempotencyRepository::ensure`] with an atomic
//! insert-if-absent, usually a unique index plus an `ON CONFLICT DO NOTHING`
//! insert. The port reports only whether the key was fresh; callers decide
//! what a replay means at their own boundary.

use async_trait::async_trait;

use crate::domain::{Ensured, IdempotencyKey};

use super::define_port_error;

define_port_error! {
    /// Errors raised by idempotency repository adapters.
    pub enum IdempotencyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "idempotency repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "idempotency repository query failed: {message}",
    }
}

/// Port for idempotency key storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdempotencyRepository: Send + Sync {
    /// Record `key`, reporting whether it was already present.
    ///
    /// The check and the insert are a single atomic step. Two racing calls
    /// with the same key both succeed, and exactly one observes
    /// [`Ensured::FRESH`].
    async fn ensure(&self, key: &IdempotencyKey) -> Result<Ensured, IdempotencyRepositoryError>;
}

/// Fixture implementation that treats every key as fresh.
#[derive(Debug, Default)]
pub struct FixtureIdempotencyRepository;

#[async_trait]
impl IdempotencyRepository for FixtureIdempotencyRepository {
    async fn ensure(&self, _key: &IdempotencyKey) -> Result<Ensured, IdempotencyRepositoryError> {
        Ok(Ensured::FRESH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, MealId};

    #[tokio::test]
    async fn fixture_repository_reports_every_key_fresh() {
        let repo = FixtureIdempotencyRepository;
        let key = IdempotencyKey::food_grab(AccountId::random(), MealId::random());
        let ensured = repo.ensure(&key).await.expect("fixture ensure succeeds");
        assert!(!ensured.already_exists);
    }
}
