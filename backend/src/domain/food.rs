//! Meal slots and food tracking records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AccountId;

/// Event days with their on-site ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDay {
    /// Opening evening.
    Friday,
    /// Main hacking day.
    Saturday,
    /// Closing day.
    Sunday,
}

impl EventDay {
    /// Ordinal used by day-filtered meal queries (friday = 1).
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Friday => 1,
            Self::Saturday => 2,
            Self::Sunday => 3,
        }
    }

    /// Capitalised display form.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for EventDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Serving categories tracked at meal stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    /// Morning serving.
    Breakfast,
    /// Midday serving.
    Lunch,
    /// Evening serving.
    Dinner,
    /// Snack table.
    Snack,
    /// Merch pickup, tracked through the same station flow.
    Merch,
}

impl MealType {
    /// Capitalised display form.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
            Self::Merch => "Merch",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Meal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealId(Uuid);

impl MealId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A serving slot volunteers check applicants into.
///
/// ## Invariants
/// - `(day, meal_type)` is unique across all meals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Stable meal key.
    pub id: MealId,
    /// Day the meal is served.
    pub day: EventDay,
    /// Serving category.
    pub meal_type: MealType,
    /// Whether the station currently accepts check-ins.
    pub is_active: bool,
}

impl Meal {
    /// Display name, e.g. "Friday Dinner".
    pub fn name(&self) -> String {
        format!("{} {}", self.day, self.meal_type)
    }
}

/// The fact "this account grabbed this meal".
///
/// ## Invariants
/// - `(account_id, meal_id)` is unique; one serving per applicant per meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodGrab {
    /// Applicant who grabbed the serving.
    pub account_id: AccountId,
    /// Meal that was served.
    pub meal_id: MealId,
    /// When the serving was recorded.
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(EventDay::Friday, MealType::Dinner, "Friday Dinner")]
    #[case(EventDay::Saturday, MealType::Breakfast, "Saturday Breakfast")]
    #[case(EventDay::Sunday, MealType::Merch, "Sunday Merch")]
    fn meal_names_read_like_signage(
        #[case] day: EventDay,
        #[case] meal_type: MealType,
        #[case] expected: &str,
    ) {
        let meal = Meal {
            id: MealId::random(),
            day,
            meal_type,
            is_active: true,
        };
        assert_eq!(meal.name(), expected);
    }

    #[rstest]
    fn day_ordinals_follow_the_event_schedule() {
        assert_eq!(EventDay::Friday.ordinal(), 1);
        assert_eq!(EventDay::Saturday.ordinal(), 2);
        assert_eq!(EventDay::Sunday.ordinal(), 3);
    }

    #[rstest]
    fn days_and_meal_types_use_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventDay::Friday).expect("serialises"),
            "\"friday\""
        );
        assert_eq!(
            serde_json::to_string(&MealType::Breakfast).expect("serialises"),
            "\"breakfast\""
        );
    }
}
