//! Food-station check-ins.
//!
//! Volunteers record one serving per applicant per meal. The grab path is
//! guarded twice: an idempotency key claims the pair before the write, and
//! the storage uniqueness constraint backstops the race where two stations
//! scan the same badge at once. Both paths surface the same conflict.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ApplicationRepository, FoodRepository, FoodRepositoryError, IdempotencyRepository,
};
use crate::domain::{
    AccountId, Error, EventDay, FoodGrab, IdempotencyKey, Meal, MealId,
};

/// A recorded serving joined with its meal name for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodGrabReceipt {
    /// The recorded serving.
    pub grab: FoodGrab,
    /// Signage name of the meal, e.g. "Saturday Lunch".
    pub meal_name: String,
}

/// Drives meal check-ins and the meal roster.
pub struct FoodService<A, D, I> {
    applications: Arc<A>,
    food: Arc<D>,
    guard: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<A, D, I> fmt::Debug for FoodService<A, D, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoodService").finish_non_exhaustive()
    }
}

impl<A, D, I> FoodService<A, D, I>
where
    A: ApplicationRepository,
    D: FoodRepository,
    I: IdempotencyRepository,
{
    /// Create the service over its storage ports.
    pub fn new(applications: Arc<A>, food: Arc<D>, guard: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            applications,
            food,
            guard,
            clock,
        }
    }

    /// Record one serving of a meal for an applicant.
    ///
    /// Inactive meals are refused outright. A repeat grab of the same meal
    /// is a conflict whether it is caught by the idempotency key or by the
    /// storage constraint underneath it.
    pub async fn grab(
        &self,
        account_id: AccountId,
        meal_id: MealId,
    ) -> Result<FoodGrabReceipt, Error> {
        self.applications
            .find_account(account_id)
            .await?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let meal = self
            .food
            .find_meal(meal_id)
            .await?
            .ok_or_else(|| Error::not_found("Meal not found"))?;
        let meal_name = meal.name();
        if !meal.is_active {
            return Err(Error::invalid_request(format!(
                "Meal '{meal_name}' is not active"
            )));
        }

        let claim = self
            .guard
            .ensure(&IdempotencyKey::food_grab(account_id, meal_id))
            .await?;
        if claim.already_exists {
            return Err(Error::conflict(format!(
                "User has already grabbed {meal_name}"
            )));
        }

        let grab = FoodGrab {
            account_id,
            meal_id,
            recorded_at: self.clock.utc(),
        };
        match self.food.insert_grab(&grab).await {
            Ok(()) => {}
            // Two stations can claim concurrently; the constraint underneath
            // reports the same conflict as the key check.
            Err(FoodRepositoryError::DuplicateKey { .. }) => {
                return Err(Error::conflict(format!(
                    "User has already grabbed {meal_name}"
                )));
            }
            Err(err) => return Err(err.into()),
        }

        info!(
            account_id = %account_id,
            meal = %meal_name,
            "food grab recorded"
        );
        Ok(FoodGrabReceipt { grab, meal_name })
    }

    /// List every meal, ordered by day then service slot.
    pub async fn meals(&self) -> Result<Vec<Meal>, Error> {
        Ok(self.food.list_meals().await?)
    }

    /// List the meals served on one day.
    pub async fn meals_for_day(&self, day: EventDay) -> Result<Vec<Meal>, Error> {
        let meals = self.food.list_meals().await?;
        Ok(meals.into_iter().filter(|meal| meal.day == day).collect())
    }

    /// List the meals currently accepting check-ins.
    pub async fn active_meals(&self) -> Result<Vec<Meal>, Error> {
        let meals = self.food.list_meals().await?;
        Ok(meals.into_iter().filter(|meal| meal.is_active).collect())
    }

    /// List the servings already recorded for an applicant, oldest first.
    pub async fn records(&self, account_id: AccountId) -> Result<Vec<FoodGrabReceipt>, Error> {
        let meals = self.food.list_meals().await?;
        let grabs = self.food.grabs_for_account(account_id).await?;
        let receipts = grabs
            .into_iter()
            .map(|grab| {
                let meal_name = meals
                    .iter()
                    .find(|meal| meal.id == grab.meal_id)
                    .map(Meal::name)
                    .unwrap_or_default();
                FoodGrabReceipt { grab, meal_name }
            })
            .collect();
        Ok(receipts)
    }

    /// Open or close a meal for check-ins.
    pub async fn set_meal_active(&self, meal_id: MealId, is_active: bool) -> Result<(), Error> {
        if !self.food.set_meal_active(meal_id, is_active).await? {
            return Err(Error::not_found("Meal not found"));
        }
        info!(meal_id = %meal_id, is_active, "meal availability changed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "food_service_tests.rs"]
mod tests;
