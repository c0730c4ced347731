//! Mutex-guarded store implementing every storage port.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, BatchStatusOutcome, FoodRepository,
    FoodRepositoryError, FormRepository, FormRepositoryError, IdempotencyRepository,
    IdempotencyRepositoryError,
};
use crate::domain::{
    Account, AccountId, Answer, AnswerFile, ApplicantStatus, Application, ApplicationId, Ensured,
    EventDay, FoodGrab, IdempotencyKey, Meal, MealId, MealType, Question, QuestionId,
    SubmissionWindow,
};

/// In-memory admission store.
///
/// Interior mutability sits behind one `std::sync::Mutex`; every method
/// locks, works synchronously, and releases before returning, so the guard
/// is never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryAdmissionsStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<AccountId, Account>,
    applications: HashMap<ApplicationId, Application>,
    by_account: HashMap<AccountId, ApplicationId>,
    questions: Vec<Question>,
    answers: HashMap<ApplicationId, Vec<Answer>>,
    answer_files: HashMap<ApplicationId, AnswerFile>,
    window: Option<SubmissionWindow>,
    meals: Vec<Meal>,
    grabs: Vec<FoodGrab>,
    claimed_keys: HashSet<String>,
}

/// The store mutex was poisoned by a panicking holder.
#[derive(Debug)]
struct StatePoisoned;

impl From<StatePoisoned> for ApplicationRepositoryError {
    fn from(_: StatePoisoned) -> Self {
        Self::connection("store mutex poisoned")
    }
}

impl From<StatePoisoned> for FormRepositoryError {
    fn from(_: StatePoisoned) -> Self {
        Self::connection("store mutex poisoned")
    }
}

impl From<StatePoisoned> for FoodRepositoryError {
    fn from(_: StatePoisoned) -> Self {
        Self::connection("store mutex poisoned")
    }
}

impl From<StatePoisoned> for IdempotencyRepositoryError {
    fn from(_: StatePoisoned) -> Self {
        Self::connection("store mutex poisoned")
    }
}

impl MemoryAdmissionsStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account so applications can reference it.
    pub fn add_account(&self, account: Account) -> Result<(), ApplicationRepositoryError> {
        let mut state = self.lock()?;
        state.accounts.insert(account.id, account);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StatePoisoned> {
        self.state.lock().map_err(|_| StatePoisoned)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryAdmissionsStore {
    async fn find_account(
        &self,
        id: AccountId,
    ) -> Result<Option<Account>, ApplicationRepositoryError> {
        let state = self.lock()?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, ApplicationRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let state = self.lock()?;
        Ok(state.applications.get(&id).cloned())
    }

    async fn find_application_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .by_account
            .get(&account_id)
            .and_then(|id| state.applications.get(id))
            .cloned())
    }

    async fn insert_application(
        &self,
        application: &Application,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut state = self.lock()?;
        if state.applications.contains_key(&application.id) {
            return Err(ApplicationRepositoryError::duplicate_key(format!(
                "application {} already exists",
                application.id
            )));
        }
        if state.by_account.contains_key(&application.account_id) {
            return Err(ApplicationRepositoryError::duplicate_key(format!(
                "account {} already has an application",
                application.account_id
            )));
        }
        state
            .by_account
            .insert(application.account_id, application.id);
        state.applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn touch(
        &self,
        id: ApplicationId,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.applications.get_mut(&id).map(|application| {
            application.updated_at = touched_at;
            application.clone()
        }))
    }

    async fn set_status(
        &self,
        id: ApplicationId,
        status: ApplicantStatus,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.applications.get_mut(&id).map(|application| {
            application.status = status;
            application.updated_at = touched_at;
            application.clone()
        }))
    }

    async fn set_status_and_draft(
        &self,
        id: ApplicationId,
        status: ApplicantStatus,
        is_draft: bool,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Application>, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        Ok(state.applications.get_mut(&id).map(|application| {
            application.status = status;
            application.is_draft = is_draft;
            application.updated_at = touched_at;
            application.clone()
        }))
    }

    async fn set_statuses(
        &self,
        ids: &[ApplicationId],
        status: ApplicantStatus,
        is_draft: bool,
        touched_at: DateTime<Utc>,
    ) -> Result<BatchStatusOutcome, ApplicationRepositoryError> {
        let mut state = self.lock()?;
        // Validate the whole batch before touching any row.
        for id in ids {
            if !state.applications.contains_key(id) {
                return Ok(BatchStatusOutcome::UnknownApplication(*id));
            }
        }
        let distinct: HashSet<ApplicationId> = ids.iter().copied().collect();
        for id in &distinct {
            if let Some(application) = state.applications.get_mut(id) {
                application.status = status;
                application.is_draft = is_draft;
                application.updated_at = touched_at;
            }
        }
        Ok(BatchStatusOutcome::Applied {
            updated: distinct.len() as u64,
        })
    }

    async fn status_counts(
        &self,
    ) -> Result<BTreeMap<ApplicantStatus, u64>, ApplicationRepositoryError> {
        let state = self.lock()?;
        let mut counts = BTreeMap::new();
        for application in state.applications.values() {
            *counts.entry(application.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_with_status(
        &self,
        statuses: &[ApplicantStatus],
    ) -> Result<u64, ApplicationRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .applications
            .values()
            .filter(|application| statuses.contains(&application.status))
            .count() as u64)
    }
}

#[async_trait]
impl FormRepository for MemoryAdmissionsStore {
    async fn list_questions(&self) -> Result<Vec<Question>, FormRepositoryError> {
        let state = self.lock()?;
        let mut questions = state.questions.clone();
        questions.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));
        Ok(questions)
    }

    async fn find_question_by_label(
        &self,
        label: &str,
    ) -> Result<Option<Question>, FormRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .questions
            .iter()
            .find(|question| question.label == label)
            .cloned())
    }

    async fn insert_question(&self, question: &Question) -> Result<(), FormRepositoryError> {
        let mut state = self.lock()?;
        if state
            .questions
            .iter()
            .any(|existing| existing.label == question.label)
        {
            return Err(FormRepositoryError::duplicate_key(format!(
                "question label '{}' already exists",
                question.label
            )));
        }
        state.questions.push(question.clone());
        Ok(())
    }

    async fn answers_for_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<Answer>, FormRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .answers
            .get(&application_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<(), FormRepositoryError> {
        let mut state = self.lock()?;
        let rows = state.answers.entry(answer.application_id).or_default();
        if rows
            .iter()
            .any(|existing| existing.question_id == answer.question_id)
        {
            return Err(FormRepositoryError::duplicate_key(
                "answer already exists for this question",
            ));
        }
        rows.push(answer.clone());
        Ok(())
    }

    async fn set_answer_value(
        &self,
        application_id: ApplicationId,
        question_id: QuestionId,
        value: Option<String>,
    ) -> Result<bool, FormRepositoryError> {
        let mut state = self.lock()?;
        let Some(rows) = state.answers.get_mut(&application_id) else {
            return Ok(false);
        };
        let Some(answer) = rows
            .iter_mut()
            .find(|answer| answer.question_id == question_id)
        else {
            return Ok(false);
        };
        answer.value = value;
        Ok(true)
    }

    async fn answer_file_for(
        &self,
        application_id: ApplicationId,
    ) -> Result<Option<AnswerFile>, FormRepositoryError> {
        let state = self.lock()?;
        Ok(state.answer_files.get(&application_id).cloned())
    }

    async fn insert_answer_file(&self, file: &AnswerFile) -> Result<(), FormRepositoryError> {
        let mut state = self.lock()?;
        if state.answer_files.contains_key(&file.application_id) {
            return Err(FormRepositoryError::duplicate_key(
                "file record already exists for this application",
            ));
        }
        state.answer_files.insert(file.application_id, file.clone());
        Ok(())
    }

    async fn set_answer_file(
        &self,
        application_id: ApplicationId,
        original_filename: String,
        file_path: String,
    ) -> Result<bool, FormRepositoryError> {
        let mut state = self.lock()?;
        let Some(file) = state.answer_files.get_mut(&application_id) else {
            return Ok(false);
        };
        file.original_filename = Some(original_filename);
        file.file_path = Some(file_path);
        Ok(true)
    }

    async fn submission_window(&self) -> Result<Option<SubmissionWindow>, FormRepositoryError> {
        let state = self.lock()?;
        Ok(state.window)
    }

    async fn insert_submission_window(
        &self,
        window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError> {
        let mut state = self.lock()?;
        if state.window.is_some() {
            return Err(FormRepositoryError::duplicate_key(
                "submission window already configured",
            ));
        }
        state.window = Some(window);
        Ok(())
    }

    async fn set_submission_window(
        &self,
        window: SubmissionWindow,
    ) -> Result<(), FormRepositoryError> {
        let mut state = self.lock()?;
        state.window = Some(window);
        Ok(())
    }
}

#[async_trait]
impl FoodRepository for MemoryAdmissionsStore {
    async fn list_meals(&self) -> Result<Vec<Meal>, FoodRepositoryError> {
        let state = self.lock()?;
        let mut meals = state.meals.clone();
        meals.sort_by_key(|meal| (meal.day, meal.meal_type));
        Ok(meals)
    }

    async fn find_meal(&self, id: MealId) -> Result<Option<Meal>, FoodRepositoryError> {
        let state = self.lock()?;
        Ok(state.meals.iter().find(|meal| meal.id == id).cloned())
    }

    async fn find_meal_by_slot(
        &self,
        day: EventDay,
        meal_type: MealType,
    ) -> Result<Option<Meal>, FoodRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .meals
            .iter()
            .find(|meal| meal.day == day && meal.meal_type == meal_type)
            .cloned())
    }

    async fn insert_meal(&self, meal: &Meal) -> Result<(), FoodRepositoryError> {
        let mut state = self.lock()?;
        if state
            .meals
            .iter()
            .any(|existing| existing.day == meal.day && existing.meal_type == meal.meal_type)
        {
            return Err(FoodRepositoryError::duplicate_key(format!(
                "meal slot {} {} already exists",
                meal.day, meal.meal_type
            )));
        }
        state.meals.push(meal.clone());
        Ok(())
    }

    async fn set_meal_active(
        &self,
        id: MealId,
        is_active: bool,
    ) -> Result<bool, FoodRepositoryError> {
        let mut state = self.lock()?;
        let Some(meal) = state.meals.iter_mut().find(|meal| meal.id == id) else {
            return Ok(false);
        };
        meal.is_active = is_active;
        Ok(true)
    }

    async fn insert_grab(&self, grab: &FoodGrab) -> Result<(), FoodRepositoryError> {
        let mut state = self.lock()?;
        if state.grabs.iter().any(|existing| {
            existing.account_id == grab.account_id && existing.meal_id == grab.meal_id
        }) {
            return Err(FoodRepositoryError::duplicate_key(
                "grab already recorded for this meal",
            ));
        }
        state.grabs.push(grab.clone());
        Ok(())
    }

    async fn grabs_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<FoodGrab>, FoodRepositoryError> {
        let state = self.lock()?;
        Ok(state
            .grabs
            .iter()
            .filter(|grab| grab.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdempotencyRepository for MemoryAdmissionsStore {
    async fn ensure(&self, key: &IdempotencyKey) -> Result<Ensured, IdempotencyRepositoryError> {
        let mut state = self.lock()?;
        if state.claimed_keys.insert(key.to_string()) {
            Ok(Ensured::FRESH)
        } else {
            Ok(Ensured::EXISTING)
        }
    }
}

#[cfg(test)]
#[path = "memory_admissions_store_tests.rs"]
mod tests;
