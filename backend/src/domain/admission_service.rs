//! Admin-side admission transitions.
//!
//! Status Override, Walk-in Mark, batch updates, and the status overview.
//! Overrides are unconditional: admins may move an application anywhere,
//! including backward. The status write is authoritative and always commits
//! first; acceptance notifications are best-effort side effects whose
//! failure is reported, never rolled back into.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::enrollment;
use crate::domain::ports::{
    ApplicationRepository, BatchStatusOutcome, FormRepository, NotificationSender, PassGenerator,
};
use crate::domain::{
    Account, ApplicantStatus, Application, ApplicationId, Error, RsvpNotifier, SubmissionWindow,
    is_early_stage,
};

/// What happened to the acceptance notification for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationDisposition {
    /// The transition does not notify.
    NotRequested,
    /// Exactly one attempt was made and the provider accepted it.
    Sent,
    /// Exactly one attempt was made and failed; the status write stands.
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

/// Result of a Status Override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOutcome {
    /// The application after the write.
    pub application: Application,
    /// Acceptance notification disposition.
    pub notification: NotificationDisposition,
}

/// Result of marking a walk-in by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkInOutcome {
    /// The application after the write.
    pub application: Application,
    /// Status before the walk-in transition.
    pub old_status: ApplicantStatus,
    /// Operator-facing summary of what happened.
    pub message: String,
    /// RSVP notification disposition.
    pub notification: NotificationDisposition,
}

/// Drives the admin side of the admission lifecycle.
pub struct AdmissionService<A, F, N, P> {
    applications: Arc<A>,
    forms: Arc<F>,
    rsvp: Arc<RsvpNotifier<N, P>>,
    clock: Arc<dyn Clock>,
}

impl<A, F, N, P> fmt::Debug for AdmissionService<A, F, N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionService").finish_non_exhaustive()
    }
}

impl<A, F, N, P> AdmissionService<A, F, N, P>
where
    A: ApplicationRepository,
    F: FormRepository,
    N: NotificationSender,
    P: PassGenerator,
{
    /// Create the service over its ports and the RSVP notifier.
    pub fn new(
        applications: Arc<A>,
        forms: Arc<F>,
        rsvp: Arc<RsvpNotifier<N, P>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            applications,
            forms,
            rsvp,
            clock,
        }
    }

    /// Move an application to any status, unconditionally.
    ///
    /// The draft flag is recomputed from the target: only `APPLYING` keeps
    /// an application editable. A target of `ACCEPTED` triggers exactly one
    /// RSVP attempt after the write commits; its failure is reported in the
    /// outcome, never by failing the override.
    pub async fn override_status(
        &self,
        application_id: ApplicationId,
        target: ApplicantStatus,
    ) -> Result<OverrideOutcome, Error> {
        let is_draft = target == ApplicantStatus::Applying;
        let application = self
            .applications
            .set_status_and_draft(application_id, target, is_draft, self.clock.utc())
            .await?
            .ok_or_else(|| Error::not_found("Application not found"))?;

        let notification = if target == ApplicantStatus::Accepted {
            self.notify_acceptance(&application).await
        } else {
            NotificationDisposition::NotRequested
        };

        Ok(OverrideOutcome {
            application,
            notification,
        })
    }

    /// Mark an applicant as a walk-in by email.
    ///
    /// Early-stage applicants (no application, `NOT_APPLIED`, `APPLYING`,
    /// `ACCOUNT_INACTIVE`) move to `WALK_IN` and still need to complete the
    /// form, so nothing is sent. Everyone else moves straight to
    /// `WALK_IN_SUBMITTED` with a synchronous RSVP attempt.
    pub async fn mark_walk_in(&self, email: &str) -> Result<WalkInOutcome, Error> {
        let account = self
            .applications
            .find_account_by_email(email)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let application = match self
            .applications
            .find_application_for_account(account.id)
            .await?
        {
            Some(application) => application,
            None => {
                enrollment::materialize(
                    self.applications.as_ref(),
                    self.forms.as_ref(),
                    &account,
                    self.clock.utc(),
                )
                .await?
            }
        };

        let old_status = application.status;
        if is_early_stage(Some(old_status)) {
            let application = self
                .set_status(application.id, ApplicantStatus::WalkIn)
                .await?;
            return Ok(WalkInOutcome {
                application,
                old_status,
                message: format!(
                    "User {email} marked as WALK_IN - they can now complete their application"
                ),
                notification: NotificationDisposition::NotRequested,
            });
        }

        let application = self
            .set_status(application.id, ApplicantStatus::WalkInSubmitted)
            .await?;
        let notification = self.send_rsvp_to(&account, application.id).await;
        Ok(WalkInOutcome {
            application,
            old_status,
            message: format!("User {email} marked as WALK_IN_SUBMITTED - RSVP email sent"),
            notification,
        })
    }

    /// Move every listed application to one status, atomically.
    ///
    /// An unknown id fails the whole batch; no partial update is ever
    /// visible. Returns the number of rows written. Fan-out notification is
    /// a separate, explicit step through the bulk dispatcher.
    pub async fn batch_update_status(
        &self,
        ids: &[ApplicationId],
        target: ApplicantStatus,
    ) -> Result<u64, Error> {
        let is_draft = target == ApplicantStatus::Applying;
        match self
            .applications
            .set_statuses(ids, target, is_draft, self.clock.utc())
            .await?
        {
            BatchStatusOutcome::Applied { updated } => Ok(updated),
            BatchStatusOutcome::UnknownApplication(id) => {
                Err(Error::not_found(format!("Application not found: {id}")))
            }
        }
    }

    /// Count applications per status, zero-filled across all statuses.
    ///
    /// Derived at read time; counts are never stored.
    pub async fn status_overview(&self) -> Result<BTreeMap<ApplicantStatus, u64>, Error> {
        let counts = self.applications.status_counts().await?;
        let mut overview = BTreeMap::new();
        for status in ApplicantStatus::ALL {
            overview.insert(status, counts.get(&status).copied().unwrap_or(0));
        }
        Ok(overview)
    }

    /// Replace the submission window, creating it when absent.
    pub async fn set_submission_window(&self, window: SubmissionWindow) -> Result<(), Error> {
        if window.closes_at <= window.opens_at {
            return Err(Error::invalid_request(
                "Submission window must close after it opens",
            ));
        }
        self.forms.set_submission_window(window).await?;
        info!(
            opens_at = %window.opens_at,
            closes_at = %window.closes_at,
            "submission window updated"
        );
        Ok(())
    }

    async fn set_status(
        &self,
        application_id: ApplicationId,
        status: ApplicantStatus,
    ) -> Result<Application, Error> {
        self.applications
            .set_status(application_id, status, self.clock.utc())
            .await?
            .ok_or_else(|| Error::internal("application row disappeared during walk-in mark"))
    }

    async fn notify_acceptance(&self, application: &Application) -> NotificationDisposition {
        let account = match self.applications.find_account(application.account_id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                return self.record_failure(application.id, "account missing for application");
            }
            Err(err) => return self.record_failure(application.id, &err.to_string()),
        };
        self.send_rsvp_to(&account, application.id).await
    }

    async fn send_rsvp_to(
        &self,
        account: &Account,
        application_id: ApplicationId,
    ) -> NotificationDisposition {
        match self
            .rsvp
            .send_rsvp(&account.email, &account.full_name(), application_id)
            .await
        {
            Ok(_) => NotificationDisposition::Sent,
            Err(err) => self.record_failure(application_id, err.message()),
        }
    }

    fn record_failure(
        &self,
        application_id: ApplicationId,
        reason: &str,
    ) -> NotificationDisposition {
        warn!(
            application_id = %application_id,
            reason,
            "acceptance notification failed; status write stands"
        );
        NotificationDisposition::Failed {
            reason: reason.to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "admission_service_tests.rs"]
mod tests;
