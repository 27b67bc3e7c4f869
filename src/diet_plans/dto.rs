use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::macros::{Macro, MacroBreakdown, MacroBreakdownInput};
use super::model::PlanType;
use super::templates::DietPlanTemplate;

pub const DURATION_DAYS: RangeInclusive<u32> = 7..=90;
pub const DAILY_CALORIES: RangeInclusive<u32> = 1200..=3500;
pub const CALORIE_STEP: u32 = 50;

/// Editor state of a diet plan that has not been saved yet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanDraft {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub daily_calories: u32,
    pub macros: MacroBreakdown,
}

impl Default for DietPlanDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            plan_type: PlanType::Custom,
            duration_days: 30,
            daily_calories: 2000,
            macros: MacroBreakdown::default(),
        }
    }
}

impl DietPlanDraft {
    pub fn from_template(t: &DietPlanTemplate) -> Self {
        Self {
            name: t.name.to_string(),
            description: t.description.to_string(),
            plan_type: t.plan_type,
            duration_days: t.duration_days,
            daily_calories: t.daily_calories,
            macros: t.macros,
        }
    }

    pub fn set_duration(&mut self, days: u32) {
        self.duration_days = days.clamp(*DURATION_DAYS.start(), *DURATION_DAYS.end());
    }

    pub fn set_daily_calories(&mut self, kcal: u32) {
        let clamped = kcal.clamp(*DAILY_CALORIES.start(), *DAILY_CALORIES.end());
        let snapped = (clamped + CALORIE_STEP / 2) / CALORIE_STEP * CALORIE_STEP;
        self.daily_calories = snapped.clamp(*DAILY_CALORIES.start(), *DAILY_CALORIES.end());
    }
}

/// Request body for creating a diet plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDietPlanRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default = "default_plan_type")]
    pub plan_type: PlanType,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub daily_calories: u32,
    pub macros: MacroBreakdownInput,
}

fn default_plan_type() -> PlanType {
    PlanType::Custom
}

impl CreateDietPlanRequest {
    /// Duration and calories are clamped to the editor's bounds.
    pub fn into_draft(self) -> DietPlanDraft {
        let mut draft = DietPlanDraft {
            name: self.name,
            description: self.description,
            plan_type: self.plan_type,
            macros: self.macros.0,
            ..DietPlanDraft::default()
        };
        draft.set_duration(self.duration_days);
        draft.set_daily_calories(self.daily_calories);
        draft
    }
}

/// Request body for moving one macro slider.
#[derive(Debug, Deserialize)]
pub struct RebalanceRequest {
    pub macros: MacroBreakdownInput,
    pub changed: Macro,
    pub value: u32,
}

#[cfg(test)]
mod draft_tests {
    use super::*;
    use crate::diet_plans::templates::find_template;

    #[test]
    fn defaults_match_editor() {
        let d = DietPlanDraft::default();
        assert_eq!(d.plan_type, PlanType::Custom);
        assert_eq!((d.duration_days, d.daily_calories), (30, 2000));
        assert_eq!(d.macros, MacroBreakdown::new(30, 40, 30).unwrap());
    }

    #[test]
    fn template_fills_every_field() {
        let t = find_template("muscle-building").unwrap();
        let d = DietPlanDraft::from_template(&t);
        assert_eq!(d.name, "Muscle Building");
        assert_eq!(d.plan_type, PlanType::MuscleGain);
        assert_eq!(d.duration_days, 60);
        assert_eq!(d.daily_calories, 2800);
        assert_eq!(d.macros.protein(), 50);
    }

    #[test]
    fn setters_respect_slider_bounds() {
        let mut d = DietPlanDraft::default();
        d.set_duration(3);
        assert_eq!(d.duration_days, 7);
        d.set_duration(365);
        assert_eq!(d.duration_days, 90);
        d.set_daily_calories(2024);
        assert_eq!(d.daily_calories, 2000);
        d.set_daily_calories(9000);
        assert_eq!(d.daily_calories, 3500);
    }

    #[test]
    fn extreme_inputs_clamp_instead_of_overflowing() {
        let mut d = DietPlanDraft::default();
        d.set_daily_calories(u32::MAX);
        assert_eq!(d.daily_calories, 3500);
        d.set_daily_calories(u32::MAX - 10);
        assert_eq!(d.daily_calories, 3500);
        d.set_duration(u32::MAX);
        assert_eq!(d.duration_days, 90);

        let req: CreateDietPlanRequest = serde_json::from_str(
            r#"{"name":"Cut","duration":4294967295,"dailyCalories":4294967295,"macros":{"protein":40,"carbs":30,"fat":30}}"#,
        )
        .unwrap();
        let draft = req.into_draft();
        assert_eq!((draft.duration_days, draft.daily_calories), (90, 3500));
    }

    #[test]
    fn create_request_requires_balanced_macros() {
        let bad = serde_json::from_str::<CreateDietPlanRequest>(
            r#"{"name":"x","duration":30,"dailyCalories":2000,"macros":{"protein":50,"carbs":50,"fat":50}}"#,
        );
        assert!(bad.is_err());

        let ok: CreateDietPlanRequest = serde_json::from_str(
            r#"{"name":"Cut","type":"weight-loss","duration":1,"dailyCalories":1000,"macros":{"protein":40,"carbs":30,"fat":30}}"#,
        )
        .unwrap();
        let draft = ok.into_draft();
        assert_eq!(draft.plan_type, PlanType::WeightLoss);
        assert_eq!(draft.duration_days, 7);
        assert_eq!(draft.daily_calories, 1200);
    }
}
