//! Ports through which the domain reaches storage, locks, and mail.
//!
//! Each port ships three faces: the trait adapters implement, a `Fixture*`
//! no-op implementation for wiring examples, and (in test builds) a
//! mockall-generated `Mock*` for expectation-driven tests.

mod application_repository;
mod food_repository;
mod form_repository;
mod idempotency_repository;
mod macros;
mod notification_sender;
mod pass_generator;
mod seed_lock;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{
    ApplicationRepository, ApplicationRepositoryError, BatchStatusOutcome,
    FixtureApplicationRepository,
};

#[cfg(test)]
pub use food_repository::MockFoodRepository;
pub use food_repository::{FixtureFoodRepository, FoodRepository, FoodRepositoryError};

#[cfg(test)]
pub use form_repository::MockFormRepository;
pub use form_repository::{FixtureFormRepository, FormRepository, FormRepositoryError};

#[cfg(test)]
pub use idempotency_repository::MockIdempotencyRepository;
pub use idempotency_repository::{
    FixtureIdempotencyRepository, IdempotencyRepository, IdempotencyRepositoryError,
};

#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{
    FixtureNotificationSender, NotificationAttachment, NotificationMessage, NotificationReceipt,
    NotificationSender, NotificationSenderError,
};

#[cfg(test)]
pub use pass_generator::MockPassGenerator;
pub use pass_generator::{FixturePassGenerator, PassGenerator, PassGeneratorError};

#[cfg(test)]
pub use seed_lock::MockSeedLockManager;
pub use seed_lock::{
    AdvisoryLockId, FixtureSeedLockManager, SeedLockError, SeedLockGuard, SeedLockManager,
};
