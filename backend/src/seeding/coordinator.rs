//! Startup seeding orchestration.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    AdvisoryLockId, FoodRepository, FoodRepositoryError, FormRepository, FormRepositoryError,
    IdempotencyRepository, SeedLockManager,
};
use crate::domain::{Error, IdempotencyKey, Meal, MealId, Question, QuestionId};
use crate::seeding::config::SeedSettings;
use crate::seeding::defaults::{DEFAULT_MEALS, DEFAULT_QUESTIONS};

/// Advisory lock serialising question seeding across replicas.
pub const QUESTION_SEED_LOCK: AdvisoryLockId = AdvisoryLockId::new(123_456_788);

/// Advisory lock serialising meal seeding across replicas.
pub const MEAL_SEED_LOCK: AdvisoryLockId = AdvisoryLockId::new(123_456_789);

/// Row tally for one seeded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Rows written by this run.
    pub inserted: u64,
    /// Rows already present, left untouched.
    pub skipped: u64,
}

/// What one startup seeding pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Question roster tally.
    pub questions: SeedSummary,
    /// Meal slot tally.
    pub meals: SeedSummary,
    /// True when this run wrote the submission window.
    pub window_seeded: bool,
}

/// Seeds reference data exactly once across any number of replicas.
#[derive(Debug)]
pub struct SeedingCoordinator<F, D, I, L> {
    forms: Arc<F>,
    food: Arc<D>,
    guard: Arc<I>,
    locks: Arc<L>,
}

impl<F, D, I, L> SeedingCoordinator<F, D, I, L>
where
    F: FormRepository,
    D: FoodRepository,
    I: IdempotencyRepository,
    L: SeedLockManager,
{
    /// Create the coordinator over its storage and lock ports.
    pub fn new(forms: Arc<F>, food: Arc<D>, guard: Arc<I>, locks: Arc<L>) -> Self {
        Self {
            forms,
            food,
            guard,
            locks,
        }
    }

    /// Apply reference data on startup when enabled.
    ///
    /// Questions and meals are seeded per row behind their advisory locks;
    /// a row that already exists is skipped, never rewritten, so label and
    /// order edits to live data survive restarts. The submission window is
    /// written only when configured and absent.
    pub async fn run_startup(
        &self,
        settings: &SeedSettings,
    ) -> Result<Option<SeedOutcome>, Error> {
        if !settings.enabled {
            info!(reason = "disabled", "reference data seeding skipped");
            return Ok(None);
        }

        let questions = self.seed_questions().await?;
        let meals = self.seed_meals().await?;
        let window_seeded = self.seed_window(settings).await?;

        info!(
            questions_inserted = questions.inserted,
            questions_skipped = questions.skipped,
            meals_inserted = meals.inserted,
            meals_skipped = meals.skipped,
            window_seeded,
            "reference data seeding finished"
        );
        Ok(Some(SeedOutcome {
            questions,
            meals,
            window_seeded,
        }))
    }

    async fn seed_questions(&self) -> Result<SeedSummary, Error> {
        let _lock = self.locks.acquire(QUESTION_SEED_LOCK).await?;
        let mut summary = SeedSummary::default();
        for (index, (label, required)) in DEFAULT_QUESTIONS.iter().enumerate() {
            let claim = self
                .guard
                .ensure(&IdempotencyKey::question_label(*label))
                .await?;
            if claim.already_exists {
                summary.skipped += 1;
                continue;
            }
            let order = u32::try_from(index)
                .map_err(|_| Error::internal("seed question order overflows"))?;
            let question = Question {
                id: QuestionId::random(),
                label: (*label).to_owned(),
                order,
                required: *required,
            };
            match self.forms.insert_question(&question).await {
                Ok(()) => summary.inserted += 1,
                // Rows can predate the key store; treat them as seeded.
                Err(FormRepositoryError::DuplicateKey { .. }) => summary.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(summary)
    }

    async fn seed_meals(&self) -> Result<SeedSummary, Error> {
        let _lock = self.locks.acquire(MEAL_SEED_LOCK).await?;
        let mut summary = SeedSummary::default();
        for (day, meal_type) in DEFAULT_MEALS {
            let claim = self
                .guard
                .ensure(&IdempotencyKey::meal_slot(*day, *meal_type))
                .await?;
            if claim.already_exists {
                summary.skipped += 1;
                continue;
            }
            let meal = Meal {
                id: MealId::random(),
                day: *day,
                meal_type: *meal_type,
                is_active: false,
            };
            match self.food.insert_meal(&meal).await {
                Ok(()) => summary.inserted += 1,
                Err(FoodRepositoryError::DuplicateKey { .. }) => summary.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(summary)
    }

    async fn seed_window(&self, settings: &SeedSettings) -> Result<bool, Error> {
        let Some(window) = settings.window() else {
            return Ok(false);
        };
        if self.forms.submission_window().await?.is_some() {
            return Ok(false);
        }
        match self.forms.insert_submission_window(window).await {
            Ok(()) => Ok(true),
            // Another replica got there between the read and the write.
            Err(FormRepositoryError::DuplicateKey { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
