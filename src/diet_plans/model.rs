use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::macros::MacroBreakdown;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PlanType {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Vegetarian,
    Vegan,
    Custom,
}

/// A saved diet plan. `meal_plan_id` links the companion meal plan created
/// with it; the link is not checked for existence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub daily_calories: u32,
    pub macros: MacroBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan_id: Option<String>,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
