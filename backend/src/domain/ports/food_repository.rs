//! Port abstraction for meal definitions and food-grab records.

use async_trait::async_trait;

use crate::domain::{AccountId, EventDay, FoodGrab, Meal, MealId, MealType};

use super::define_port_error;

define_port_error! {
    /// Errors raised by food repository adapters.
    pub enum FoodRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "food repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "food repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        DuplicateKey { message: String } => "food row already exists: {message}",
    }
}

/// Port for meal and grab storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// List every meal, ordered by day then service slot.
    async fn list_meals(&self) -> Result<Vec<Meal>, FoodRepositoryError>;

    /// Resolve a meal by its identifier.
    async fn find_meal(&self, id: MealId) -> Result<Option<Meal>, FoodRepositoryError>;

    /// Resolve a meal by its day and type.
    async fn find_meal_by_slot(
        &self,
        day: EventDay,
        meal_type: MealType,
    ) -> Result<Option<Meal>, FoodRepositoryError>;

    /// Persist a new meal. Fails with `DuplicateKey` when the slot is taken.
    async fn insert_meal(&self, meal: &Meal) -> Result<(), FoodRepositoryError>;

    /// Toggle whether a meal is currently being served.
    ///
    /// Returns `false` when the id is unknown.
    async fn set_meal_active(
        &self,
        id: MealId,
        is_active: bool,
    ) -> Result<bool, FoodRepositoryError>;

    /// Persist a grab. Fails with `DuplicateKey` when the attendee already
    /// grabbed this meal.
    async fn insert_grab(&self, grab: &FoodGrab) -> Result<(), FoodRepositoryError>;

    /// List the grabs recorded for an attendee, oldest first.
    async fn grabs_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<FoodGrab>, FoodRepositoryError>;
}

/// Fixture implementation for wiring without a real store.
#[derive(Debug, Default)]
pub struct FixtureFoodRepository;

#[async_trait]
impl FoodRepository for FixtureFoodRepository {
    async fn list_meals(&self) -> Result<Vec<Meal>, FoodRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_meal(&self, _id: MealId) -> Result<Option<Meal>, FoodRepositoryError> {
        Ok(None)
    }

    async fn find_meal_by_slot(
        &self,
        _day: EventDay,
        _meal_type: MealType,
    ) -> Result<Option<Meal>, FoodRepositoryError> {
        Ok(None)
    }

    async fn insert_meal(&self, _meal: &Meal) -> Result<(), FoodRepositoryError> {
        Ok(())
    }

    async fn set_meal_active(
        &self,
        _id: MealId,
        _is_active: bool,
    ) -> Result<bool, FoodRepositoryError> {
        Ok(true)
    }

    async fn insert_grab(&self, _grab: &FoodGrab) -> Result<(), FoodRepositoryError> {
        Ok(())
    }

    async fn grabs_for_account(
        &self,
        _account_id: AccountId,
    ) -> Result<Vec<FoodGrab>, FoodRepositoryError> {
        Ok(Vec::new())
    }
}
