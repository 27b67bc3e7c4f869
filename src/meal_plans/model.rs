use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Day labels of every plan, in order. Day identifiers are their 1-based position.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// A recipe placed in a day. The recipe fields are a snapshot, not a reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    pub id: String,
    #[serde(rename = "type")]
    pub slot: MealSlot,
    pub recipe_id: String,
    pub recipe_name: String,
    pub recipe_image: String,
}

/// A meal item before the store assigns its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMealItem {
    #[serde(rename = "type")]
    pub slot: MealSlot,
    pub recipe_id: String,
    pub recipe_name: String,
    pub recipe_image: String,
}

impl NewMealItem {
    pub fn with_id(self, id: String) -> MealItem {
        MealItem {
            id,
            slot: self.slot,
            recipe_id: self.recipe_id,
            recipe_name: self.recipe_name,
            recipe_image: self.recipe_image,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealPlanDay {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub meals: Vec<MealItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub days: Vec<MealPlanDay>,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MealPlan {
    pub fn empty_week() -> Vec<MealPlanDay> {
        WEEKDAYS
            .iter()
            .enumerate()
            .map(|(i, name)| MealPlanDay {
                id: (i + 1).to_string(),
                name: (*name).to_string(),
                meals: Vec::new(),
            })
            .collect()
    }

    pub fn day(&self, day_id: &str) -> Option<&MealPlanDay> {
        self.days.iter().find(|d| d.id == day_id)
    }
}
