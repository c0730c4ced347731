//! Applicant-facing submission flow.
//!
//! Covers everything an applicant does before review: fetching or creating
//! their application, saving draft answers, recording the resume upload,
//! submitting, and responding to an acceptance invite. Submission
//! preconditions run in a fixed order and the first failure wins, so callers
//! always see the most actionable error.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mockable::Clock;

use crate::domain::enrollment;
use crate::domain::ports::{ApplicationRepository, FormRepository};
use crate::domain::{
    Account, AccountId, Answer, AnswerFile, ApplicantStatus, Application, ApplicationId, Error,
    MAX_ANSWER_LEN, Question, QuestionId, SubmissionWindow,
};

/// An application together with its form content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    /// The application record.
    pub application: Application,
    /// Answer rows in question order.
    pub answers: Vec<Answer>,
    /// Resume upload slot, when a resume question is seeded.
    pub answer_file: Option<AnswerFile>,
}

/// One draft answer update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPatch {
    /// Question being answered.
    pub question_id: QuestionId,
    /// New value; `None` clears the answer.
    pub value: Option<String>,
}

/// The configured window and whether it is open right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    /// The stored window, absent until seeded.
    pub window: Option<SubmissionWindow>,
    /// True when submissions are currently accepted.
    pub open_now: bool,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// The application after the transition.
    pub application: Application,
    /// True when this was a walk-in submission, so the caller can pick the
    /// acceptance-style notification template instead of the plain one.
    pub is_walk_in_submission: bool,
}

/// Drives the applicant side of the admission lifecycle.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::SubmissionService;
/// use backend::domain::ports::{FixtureApplicationRepository, FixtureFormRepository};
/// use mockable::DefaultClock;
///
/// let service = SubmissionService::new(
///     Arc::new(FixtureApplicationRepository),
///     Arc::new(FixtureFormRepository),
///     Arc::new(DefaultClock),
/// );
/// ```
pub struct SubmissionService<A, F> {
    applications: Arc<A>,
    forms: Arc<F>,
    clock: Arc<dyn Clock>,
}

impl<A, F> fmt::Debug for SubmissionService<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionService").finish_non_exhaustive()
    }
}

impl<A, F> SubmissionService<A, F>
where
    A: ApplicationRepository,
    F: FormRepository,
{
    /// Create the service over its storage ports.
    pub fn new(applications: Arc<A>, forms: Arc<F>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            forms,
            clock,
        }
    }

    /// List the seeded questions in display order.
    pub async fn questions(&self) -> Result<Vec<Question>, Error> {
        Ok(self.forms.list_questions().await?)
    }

    /// The configured submission window and whether it is open right now.
    pub async fn submission_window(&self) -> Result<WindowStatus, Error> {
        let window = self.forms.submission_window().await?;
        let open_now = window.is_some_and(|w| w.contains(self.clock.utc()));
        Ok(WindowStatus { window, open_now })
    }

    /// Fetch the account's application, creating it on first contact.
    ///
    /// Enrollment materialises one answer per seeded question with identity
    /// fields prefilled, plus the resume upload slot.
    pub async fn application_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<ApplicationForm, Error> {
        let account = self.require_account(account_id).await?;
        let existing = self
            .applications
            .find_application_for_account(account_id)
            .await?;

        self.check_window(existing.as_ref().map(|a| a.status))
            .await?;

        let application = match existing {
            Some(application) => application,
            None => self.enroll(&account).await?,
        };

        let answers = self.forms.answers_for_application(application.id).await?;
        let answer_file = self.forms.answer_file_for(application.id).await?;
        Ok(ApplicationForm {
            application,
            answers,
            answer_file,
        })
    }

    /// Save a batch of draft answers.
    ///
    /// Allowed only while the window is open (walk-ins bypass the window)
    /// and the application is still in a submittable status.
    pub async fn save_answers(
        &self,
        account_id: AccountId,
        patches: Vec<AnswerPatch>,
    ) -> Result<Application, Error> {
        let account = self.require_account(account_id).await?;
        let application = self.writable_application(&account).await?;

        for patch in &patches {
            if patch
                .value
                .as_ref()
                .is_some_and(|v| v.chars().count() > MAX_ANSWER_LEN)
            {
                return Err(Error::invalid_request(format!(
                    "Answer for question {} exceeds {MAX_ANSWER_LEN} characters",
                    patch.question_id
                )));
            }
        }

        for patch in patches {
            let updated = self
                .forms
                .set_answer_value(application.id, patch.question_id, patch.value)
                .await?;
            if !updated {
                return Err(Error::not_found(format!(
                    "Form Application not found for question_id: {}",
                    patch.question_id
                )));
            }
        }

        self.touch(application.id).await
    }

    /// Record the resume the applicant uploaded.
    ///
    /// The byte transport lives outside this crate; this records the
    /// metadata that makes the application submittable.
    pub async fn record_resume(
        &self,
        account_id: AccountId,
        original_filename: String,
        file_path: String,
    ) -> Result<Application, Error> {
        if !original_filename.ends_with(".pdf") {
            return Err(Error::invalid_request("File not pdf"));
        }

        let account = self.require_account(account_id).await?;
        let application = self.writable_application(&account).await?;

        let updated = self
            .forms
            .set_answer_file(application.id, original_filename, file_path)
            .await?;
        if !updated {
            return Err(Error::not_found("Resume upload slot not found"));
        }

        self.touch(application.id).await
    }

    /// Submit the application.
    ///
    /// Preconditions run in order and the first failure wins: window (or
    /// walk-in bypass), required answers, resume, not already submitted
    /// (conflict), submittable status (forbidden). The status flip and the
    /// draft-flag clear commit together.
    pub async fn submit(&self, account_id: AccountId) -> Result<SubmitOutcome, Error> {
        let application = self
            .applications
            .find_application_for_account(account_id)
            .await?
            .ok_or_else(|| Error::not_found("Application not found"))?;

        self.check_window(Some(application.status)).await?;
        self.check_required_answers(application.id).await?;

        let answer_file = self.forms.answer_file_for(application.id).await?;
        if !answer_file.is_some_and(|file| file.is_uploaded()) {
            return Err(Error::invalid_request("Resume not uploaded"));
        }

        if application.status.is_already_submitted() {
            return Err(Error::conflict("Application already submitted"));
        }
        if !application.status.can_submit() {
            return Err(Error::forbidden("User not applying"));
        }

        let is_walk_in_submission = application.status.is_walk_in();
        let next = if is_walk_in_submission {
            ApplicantStatus::WalkInSubmitted
        } else {
            ApplicantStatus::Applied
        };

        let application = self
            .applications
            .set_status_and_draft(application.id, next, false, self.clock.utc())
            .await?
            .ok_or_else(|| Error::internal("application row disappeared during submit"))?;

        Ok(SubmitOutcome {
            application,
            is_walk_in_submission,
        })
    }

    /// Confirm an acceptance invite.
    pub async fn accept_invite(&self, account_id: AccountId) -> Result<Application, Error> {
        self.answer_invite(account_id, ApplicantStatus::AcceptedInvite)
            .await
    }

    /// Decline an acceptance invite.
    pub async fn reject_invite(&self, account_id: AccountId) -> Result<Application, Error> {
        self.answer_invite(account_id, ApplicantStatus::RejectedInvite)
            .await
    }

    async fn answer_invite(
        &self,
        account_id: AccountId,
        response: ApplicantStatus,
    ) -> Result<Application, Error> {
        let application = self
            .applications
            .find_application_for_account(account_id)
            .await?
            .ok_or_else(|| Error::not_found("Invite not found"))?;

        // Only a plain ACCEPTED holds an open invite. Anything else means
        // there is nothing to respond to.
        if application.status != ApplicantStatus::Accepted {
            return Err(Error::not_found("Invite not found"));
        }

        self.applications
            .set_status(application.id, response, self.clock.utc())
            .await?
            .ok_or_else(|| Error::internal("application row disappeared during invite response"))
    }

    async fn require_account(&self, account_id: AccountId) -> Result<Account, Error> {
        self.applications
            .find_account(account_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Window gate shared by every applicant-facing mutation. Walk-in
    /// statuses bypass the window entirely.
    async fn check_window(&self, status: Option<ApplicantStatus>) -> Result<(), Error> {
        if status.is_some_and(ApplicantStatus::is_walk_in) {
            return Ok(());
        }
        let window = self.forms.submission_window().await?;
        if window.is_some_and(|w| w.contains(self.clock.utc())) {
            Ok(())
        } else {
            Err(Error::invalid_request("Submitting outside submission time"))
        }
    }

    /// Resolve the application for a draft mutation, creating it on first
    /// contact and enforcing the window and status gates.
    async fn writable_application(&self, account: &Account) -> Result<Application, Error> {
        let existing = self
            .applications
            .find_application_for_account(account.id)
            .await?;

        self.check_window(existing.as_ref().map(|a| a.status))
            .await?;

        let application = match existing {
            Some(application) => application,
            None => self.enroll(account).await?,
        };

        if !application.status.can_submit() {
            return Err(Error::forbidden("User not applying"));
        }
        Ok(application)
    }

    async fn enroll(&self, account: &Account) -> Result<Application, Error> {
        enrollment::materialize(
            self.applications.as_ref(),
            self.forms.as_ref(),
            account,
            self.clock.utc(),
        )
        .await
    }

    async fn check_required_answers(&self, application_id: ApplicationId) -> Result<(), Error> {
        let questions = self.forms.list_questions().await?;
        let answers = self.forms.answers_for_application(application_id).await?;
        let by_question: HashMap<QuestionId, &Answer> =
            answers.iter().map(|a| (a.question_id, a)).collect();

        for question in questions.iter().filter(|q| q.required) {
            // The resume question has no answer row; its gate is the
            // AnswerFile check that follows.
            let Some(answer) = by_question.get(&question.id) else {
                continue;
            };
            if !answer.is_answered() {
                return Err(Error::invalid_request(format!(
                    "{} not answered",
                    question.label
                )));
            }
        }
        Ok(())
    }

    async fn touch(&self, application_id: ApplicationId) -> Result<Application, Error> {
        self.applications
            .touch(application_id, self.clock.utc())
            .await?
            .ok_or_else(|| Error::internal("application row disappeared during update"))
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;
