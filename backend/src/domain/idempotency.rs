//! Idempotency guard keys.
//!
//! Purpose: a single check-then-act contract for the operations that must
//! happen at most once, such as food grabs and seed rows. Callers ask the
//! [`IdempotencyRepository`] to `ensure` a key and only proceed when the key
//! was absent; "already exists" is the expected steady state under retries
//! and duplicate requests, never an error. Storage uniqueness violations are
//! translated at this boundary rather than leaked as raw constraint errors.
//!
//! [`IdempotencyRepository`]: crate::domain::ports::IdempotencyRepository

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, EventDay, MealId, MealType};

/// Uniqueness key for an at-most-once operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum IdempotencyKey {
    /// One serving per applicant per meal.
    FoodGrab {
        /// Applicant receiving the serving.
        account_id: AccountId,
        /// Meal being served.
        meal_id: MealId,
    },
    /// One seeded question per label.
    QuestionLabel {
        /// Unique question label.
        label: String,
    },
    /// One seeded meal per day/type slot.
    MealSlot {
        /// Day the meal is served.
        day: EventDay,
        /// Serving category.
        meal_type: MealType,
    },
}

impl IdempotencyKey {
    /// Key guarding a food-station serving.
    pub const fn food_grab(account_id: AccountId, meal_id: MealId) -> Self {
        Self::FoodGrab {
            account_id,
            meal_id,
        }
    }

    /// Key guarding a seeded question row.
    pub fn question_label(label: impl Into<String>) -> Self {
        Self::QuestionLabel {
            label: label.into(),
        }
    }

    /// Key guarding a seeded meal slot.
    pub const fn meal_slot(day: EventDay, meal_type: MealType) -> Self {
        Self::MealSlot { day, meal_type }
    }
}

impl fmt::Display for IdempotencyKey {
    /// Canonical text form, stable enough to back a key-value uniqueness
    /// constraint in adapters that do not model the underlying tables.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FoodGrab {
                account_id,
                meal_id,
            } => write!(f, "food-grab:{account_id}:{meal_id}"),
            Self::QuestionLabel { label } => write!(f, "question-label:{label}"),
            Self::MealSlot { day, meal_type } => {
                write!(f, "meal-slot:{}:{}", day.ordinal(), meal_type)
            }
        }
    }
}

/// Outcome of an `ensure` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ensured {
    /// True when the keyed operation already happened.
    pub already_exists: bool,
}

impl Ensured {
    /// The key was absent; the caller holds the first claim.
    pub const FRESH: Self = Self {
        already_exists: false,
    };

    /// The key was already present.
    pub const EXISTING: Self = Self {
        already_exists: true,
    };
}
