use serde::Deserialize;

/// Request body for creating a meal plan.
#[derive(Debug, Deserialize)]
pub struct CreateMealPlanRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateMealPlanRequest {
    /// Blank descriptions are dropped.
    pub fn description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}
