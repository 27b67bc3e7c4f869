use serde::Serialize;

use super::macros::MacroBreakdown;
use super::model::PlanType;

/// A preset a new diet plan can start from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanTemplate {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    #[serde(rename = "duration")]
    pub duration_days: u32,
    pub daily_calories: u32,
    pub macros: MacroBreakdown,
    pub image: &'static str,
}

struct Preset {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    plan_type: PlanType,
    duration_days: u32,
    daily_calories: u32,
    shares: (u32, u32, u32),
    image: &'static str,
}

const PRESETS: [Preset; 6] = [
    Preset {
        slug: "weight-loss",
        name: "Weight Loss Plan",
        description: "A calorie-deficit plan designed for sustainable weight loss.",
        plan_type: PlanType::WeightLoss,
        duration_days: 30,
        daily_calories: 1800,
        shares: (40, 30, 30),
        image: "https://images.pexels.com/photos/216951/pexels-photo-216951.jpeg",
    },
    Preset {
        slug: "muscle-building",
        name: "Muscle Building",
        description: "High protein diet to support muscle growth and recovery.",
        plan_type: PlanType::MuscleGain,
        duration_days: 60,
        daily_calories: 2800,
        shares: (50, 30, 20),
        image: "https://images.pexels.com/photos/1552242/pexels-photo-1552242.jpeg",
    },
    Preset {
        slug: "balanced-nutrition",
        name: "Balanced Nutrition",
        description: "A well-balanced diet for overall health and maintenance.",
        plan_type: PlanType::Maintenance,
        duration_days: 90,
        daily_calories: 2200,
        shares: (30, 40, 30),
        image: "https://images.pexels.com/photos/1640774/pexels-photo-1640774.jpeg",
    },
    Preset {
        slug: "vegetarian",
        name: "Vegetarian Plan",
        description: "Plant-based nutrition without meat products.",
        plan_type: PlanType::Vegetarian,
        duration_days: 30,
        daily_calories: 2000,
        shares: (25, 50, 25),
        image: "https://images.pexels.com/photos/1059905/pexels-photo-1059905.jpeg",
    },
    Preset {
        slug: "keto",
        name: "Keto Diet",
        description: "Low-carb, high-fat diet to promote ketosis.",
        plan_type: PlanType::Custom,
        duration_days: 30,
        daily_calories: 1900,
        shares: (30, 10, 60),
        image: "https://images.pexels.com/photos/769289/pexels-photo-769289.jpeg",
    },
    Preset {
        slug: "low-carb",
        name: "Low-Carb Plan",
        description: "Reduced carbohydrate intake for blood sugar management.",
        plan_type: PlanType::Custom,
        duration_days: 60,
        daily_calories: 2000,
        shares: (35, 25, 40),
        image: "https://images.pexels.com/photos/8844888/pexels-photo-8844888.jpeg",
    },
];

/// The template catalog. Shares pass through `normalize`, so a mistyped
/// preset can never produce a breakdown off 100.
pub fn templates() -> Vec<DietPlanTemplate> {
    PRESETS
        .iter()
        .map(|p| {
            let (protein, carbs, fat) = p.shares;
            DietPlanTemplate {
                slug: p.slug,
                name: p.name,
                description: p.description,
                plan_type: p.plan_type,
                duration_days: p.duration_days,
                daily_calories: p.daily_calories,
                macros: MacroBreakdown::normalize(protein, carbs, fat),
                image: p.image,
            }
        })
        .collect()
}

pub fn find_template(slug: &str) -> Option<DietPlanTemplate> {
    templates().into_iter().find(|t| t.slug == slug)
}
