//! Port abstraction for account and application persistence.
//!
//! Adapters own the transaction boundary: every mutating method commits all
//! of its field updates atomically, so a concurrent reader can never observe
//! a status flipped without its draft flag (or the reverse).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::domain::{Account, AccountId, ApplicantStatus, Application, ApplicationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "application repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        DuplicateKey { message: String } => "application already exists: {message}",
    }
}

/// Outcome of a transactional batch status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatusOutcome {
    /// Every listed application was updated.
    Applied {
        /// Number of rows written.
        updated: u64,
    },
    /// An id did not resolve; no row was changed.
    UnknownApplication(ApplicationId),
}

/// Port for account and application storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Resolve an account by its internal key.
    async fn find_account(
        &self,
        id: AccountId,
    ) -> Result<Option<Account>, ApplicationRepositoryError>;

    /// Resolve an account by email, the walk-in lookup path.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, ApplicationRepositoryError>;

    /// Resolve an application by its public identifier.
    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Resolve the application owned by an account, if any.
    async fn find_application_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Persist a new application.
    ///
    /// Fails with `DuplicateKey` when the account already owns an
    /// application or the public identifier collides.
    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<(), ApplicationRepositoryError>;

    /// Bump the update timestamp without changing anything else.
    ///
    /// Returns the updated application, or `None` when the id is unknown.
    async fn touch(
        &self,
        id: ApplicationId,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Write a new status, leaving the draft flag untouched.
    ///
    /// Returns the updated application, or `None` when the id is unknown.
    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicantStatus,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Write a new status and draft flag in one commit.
    ///
    /// Returns the updated application, or `None` when the id is unknown.
    async fn set_status_and_draft(
        &self,
        id: ApplicationId,
        status: ApplicantStatus,
        is_draft: bool,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError>;

    /// Move every listed application to one status in a single transaction.
    ///
    /// An unknown id rolls the whole batch back and is reported through
    /// [`BatchStatusOutcome::UnknownApplication`].
    async fn set_statuses(
        &self,
        ids: &[ApplicationId],
        status: ApplicantStatus,
        is_draft: bool,
        touched_at: DateTime<Utc>,
    ) -> Result<BatchStatusOutcome, ApplicationRepositoryError>;

    /// Count applications per status. Statuses with no rows are absent.
    async fn status_counts(
        &self,
    ) -> Result<BTreeMap<ApplicantStatus, u64>, ApplicationRepositoryError>;

    /// Count applications whose status is in the given set.
    async fn count_with_status(
        &self,
        statuses: &[ApplicantStatus],
    ) -> Result<u64, ApplicationRepositoryError>;
}

/// Fixture implementation for wiring without a real store.
///
/// Finds return `None`, writes succeed without effect. Use it in doctests
/// and in tests where application storage is not under test.
#[derive(Debug, Default)]
pub struct FixtureApplicationRepository;

#[async_trait]
impl ApplicationRepository for FixtureApplicationRepository {
    async fn find_account(
        &self,
        _id: AccountId,
    ) -> Result<Option<Account>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn find_account_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<Account>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn find_application(
        &self,
        _id: ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn find_application_for_account(
        &self,
        _account_id: AccountId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn insert_application(
        &self,
        _application: &Application,
    ) -> Result<(), ApplicationRepositoryError> {
        Ok(())
    }

    async fn touch(
        &self,
        _id: ApplicationId,
        _touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn set_status(
        &self,
        _id: ApplicationId,
        _status: ApplicantStatus,
        _touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn set_status_and_draft(
        &self,
        _id: ApplicationId,
        _status: ApplicantStatus,
        _is_draft: bool,
        _touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        Ok(None)
    }

    async fn set_statuses(
        &self,
        _ids: &[ApplicationId],
        _status: ApplicantStatus,
        _is_draft: bool,
        _touched_at: DateTime<Utc>,
    ) -> Result<BatchStatusOutcome, ApplicationRepositoryError> {
        Ok(BatchStatusOutcome::Applied { updated: 0 })
    }

    async fn status_counts(
        &self,
    ) -> Result<BTreeMap<ApplicantStatus, u64>, ApplicationRepositoryError> {
        Ok(BTreeMap::new())
    }

    async fn count_with_status(
        &self,
        _statuses: &[ApplicantStatus],
    ) -> Result<u64, ApplicationRepositoryError> {
        Ok(0)
    }
}
