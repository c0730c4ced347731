//! On-site check-in (QR scan).
//!
//! A scan resolves an application id from a badge, gates on the check-in
//! predicate, applies at most one status transition, and returns a snapshot
//! volunteers read off one screen: greeting, form answers keyed for display,
//! food history, and live counters. Repeat scans are idempotent.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{ApplicationRepository, FoodRepository, FormRepository};
use crate::domain::{
    Account, AccountId, ApplicantStatus, Application, ApplicationId, Error, EventDay, MealId,
    MealType,
};

/// One past food serving, joined with its meal for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    /// Meal that was served.
    pub meal_id: MealId,
    /// Signage name, e.g. "Saturday Lunch".
    pub name: String,
    /// Day the meal is served.
    pub day: EventDay,
    /// Serving category.
    pub meal_type: MealType,
    /// When the serving was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Everything the door volunteer sees after one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInOutcome {
    /// Greeting describing what just happened.
    pub message: String,
    /// Application the badge resolved to.
    pub application_id: ApplicationId,
    /// Status after the scan.
    pub status: ApplicantStatus,
    /// Form answers keyed for display, always including `firstName`,
    /// `lastName` and `email`.
    pub answers: BTreeMap<String, Option<String>>,
    /// Food servings already recorded for this applicant.
    pub food: Vec<FoodRecord>,
    /// Applicants scanned in through the standard path, after this scan.
    pub scanned_count: u64,
    /// Walk-ins (form outstanding or submitted), after this scan.
    pub walk_in_count: u64,
}

/// Handles badge scans at the venue door.
pub struct CheckInService<A, F, D> {
    applications: Arc<A>,
    forms: Arc<F>,
    food: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<A, F, D> fmt::Debug for CheckInService<A, F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckInService").finish_non_exhaustive()
    }
}

impl<A, F, D> CheckInService<A, F, D>
where
    A: ApplicationRepository,
    F: FormRepository,
    D: FoodRepository,
{
    /// Create the service over its storage ports.
    pub fn new(applications: Arc<A>, forms: Arc<F>, food: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            forms,
            food,
            clock,
        }
    }

    /// Admit the applicant behind a scanned badge.
    ///
    /// Standard admits move to `SCANNED_IN` once and greet plainly on every
    /// later scan without writing again. Walk-ins settle on
    /// `WALK_IN_SUBMITTED` and get the walk-in greeting. Ineligible statuses
    /// are rejected with the offending status named in both the message and
    /// the error details.
    pub async fn scan(&self, application_id: ApplicationId) -> Result<CheckInOutcome, Error> {
        let application = self
            .applications
            .find_application(application_id)
            .await?
            .ok_or_else(|| Error::not_found("No application found with this QR code"))?;
        let account = self
            .applications
            .find_account(application.account_id)
            .await?
            .ok_or_else(|| Error::internal("account missing for application"))?;

        if !application.status.can_scan_in() {
            let status = application.status;
            return Err(Error::forbidden(format!(
                "User with status {status} is not eligible for check-in"
            ))
            .with_details(json!({ "currentStatus": status })));
        }

        let first_name = account.first_name.as_str();
        let (target, message) = if application.status.is_walk_in() {
            (
                Some(ApplicantStatus::WalkInSubmitted),
                format!("Welcome walk-in {first_name}!"),
            )
        } else if application.status == ApplicantStatus::ScannedIn {
            (None, format!("Already scanned in: {first_name}!"))
        } else {
            (
                Some(ApplicantStatus::ScannedIn),
                format!("Welcome {first_name}!"),
            )
        };

        let application = match target {
            Some(status) => self
                .applications
                .set_status(application.id, status, self.clock.utc())
                .await?
                .ok_or_else(|| Error::internal("application row disappeared during scan"))?,
            None => application,
        };

        let answers = self.answer_snapshot(&application, &account).await?;
        let food = self.food_history(account.id).await?;
        // Counters reflect this scan, so they are read after the write.
        let scanned_count = self
            .applications
            .count_with_status(&[ApplicantStatus::ScannedIn])
            .await?;
        let walk_in_count = self
            .applications
            .count_with_status(&[ApplicantStatus::WalkIn, ApplicantStatus::WalkInSubmitted])
            .await?;

        info!(
            application_id = %application.id,
            status = %application.status,
            scanned_count,
            walk_in_count,
            "badge scanned"
        );

        Ok(CheckInOutcome {
            message,
            application_id: application.id,
            status: application.status,
            answers,
            food,
            scanned_count,
            walk_in_count,
        })
    }

    async fn answer_snapshot(
        &self,
        application: &Application,
        account: &Account,
    ) -> Result<BTreeMap<String, Option<String>>, Error> {
        let mut answers = BTreeMap::new();
        answers.insert("firstName".to_owned(), Some(account.first_name.clone()));
        answers.insert("lastName".to_owned(), Some(account.last_name.clone()));
        answers.insert("email".to_owned(), Some(account.email.clone()));

        let questions = self.forms.list_questions().await?;
        let labels: HashMap<_, _> = questions
            .iter()
            .map(|question| (question.id, question.label.as_str()))
            .collect();
        for answer in self.forms.answers_for_application(application.id).await? {
            if let Some(label) = labels.get(&answer.question_id) {
                answers.insert(answer_key(label), answer.value);
            }
        }
        Ok(answers)
    }

    async fn food_history(&self, account_id: AccountId) -> Result<Vec<FoodRecord>, Error> {
        let meals = self.food.list_meals().await?;
        let by_id: HashMap<_, _> = meals.iter().map(|meal| (meal.id, meal)).collect();
        let mut records = Vec::new();
        for grab in self.food.grabs_for_account(account_id).await? {
            if let Some(meal) = by_id.get(&grab.meal_id) {
                records.push(FoodRecord {
                    meal_id: meal.id,
                    name: meal.name(),
                    day: meal.day,
                    meal_type: meal.meal_type,
                    recorded_at: grab.recorded_at,
                });
            }
        }
        Ok(records)
    }
}

/// Display key for a question label.
///
/// A few well-known labels keep their historical camelCase keys; everything
/// else collapses to lowercase with spaces removed.
fn answer_key(label: &str) -> String {
    match label {
        "Phone Number" => "phoneNumber".to_owned(),
        "Dietary Restrictions" => "dietaryRestrictions".to_owned(),
        "T-Shirt Size" => "tShirtSize".to_owned(),
        _ => label.to_lowercase().replace(' ', ""),
    }
}

#[cfg(test)]
#[path = "check_in_service_tests.rs"]
mod tests;
