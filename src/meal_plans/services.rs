use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::collection::ScopedCollection;
use crate::error::StoreError;
use crate::meal_plans::model::{MealItem, MealPlan, NewMealItem, WEEKDAYS};
use crate::storage::{KeyValueStore, MEAL_PLANS_PREFIX};

/// What subscribers of the meal plan store observe.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanSnapshot {
    pub meal_plans: Vec<MealPlan>,
    pub active_meal_plan: Option<MealPlan>,
}

/// Weekly meal plans of the current user plus the one in focus.
///
/// The active plan is tracked by identifier and resolved against the current
/// collection on every read.
pub struct MealPlanStore {
    plans: ScopedCollection<MealPlan>,
    active_id: Option<String>,
    tx: watch::Sender<MealPlanSnapshot>,
}

impl MealPlanStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (tx, _) = watch::channel(MealPlanSnapshot::default());
        Self {
            plans: ScopedCollection::new(kv, MEAL_PLANS_PREFIX),
            active_id: None,
            tx,
        }
    }

    /// Reloads for `user_id`. The active plan survives only if it belongs to
    /// the loaded collection; otherwise the first stored plan becomes active.
    pub fn load(&mut self, user_id: Option<&str>) {
        self.plans.load(user_id);
        let keep = self
            .active_id
            .as_deref()
            .is_some_and(|id| self.find(id).is_some());
        if !keep {
            self.active_id = self.plans.items().first().map(|p| p.id.clone());
        }
        self.publish();
    }

    pub fn create(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> Result<MealPlan, StoreError> {
        let user_id = self.plans.owner().ok_or(StoreError::NotSignedIn)?;
        let name = required_name(name)?;
        let plan = MealPlan {
            id: Uuid::now_v7().to_string(),
            name,
            description,
            days: MealPlan::empty_week(),
            user_id: user_id.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        info!(plan_id = %plan.id, %user_id, "meal plan created");

        let mut next = self.plans.items().to_vec();
        next.push(plan.clone());
        self.plans.replace(next);
        self.active_id = Some(plan.id.clone());
        self.publish();
        Ok(plan)
    }

    /// Replaces the stored plan with the same identifier and returns what was
    /// stored. The week itself is fixed at creation: the replacement must keep
    /// the seven labelled days. Owner and creation time always come from the
    /// stored plan.
    pub fn update(&mut self, mut plan: MealPlan) -> Result<MealPlan, StoreError> {
        plan.name = required_name(&plan.name)?;
        let labels: Vec<&str> = plan.days.iter().map(|d| d.name.as_str()).collect();
        if labels != WEEKDAYS {
            return Err(StoreError::validation(
                "A meal plan must keep its seven days, Monday to Sunday",
            ));
        }
        let stored = self
            .find(&plan.id)
            .ok_or_else(|| StoreError::NotFound("meal plan".into()))?;
        plan.user_id = stored.user_id.clone();
        plan.created_at = stored.created_at;
        self.replace_plan(plan.clone());
        Ok(plan)
    }

    /// Returns `false` when nothing matched. If the deleted plan was active
    /// the first surviving plan takes over.
    pub fn delete(&mut self, plan_id: &str) -> bool {
        if self.find(plan_id).is_none() {
            return false;
        }
        let next: Vec<MealPlan> = self
            .plans
            .items()
            .iter()
            .filter(|p| p.id != plan_id)
            .cloned()
            .collect();
        if self.active_id.as_deref() == Some(plan_id) {
            self.active_id = next.first().map(|p| p.id.clone());
        }
        self.plans.replace(next);
        info!(%plan_id, "meal plan deleted");
        self.publish();
        true
    }

    /// Returns `false` and leaves the active plan alone for unknown ids.
    pub fn set_active(&mut self, plan_id: &str) -> bool {
        if self.find(plan_id).is_none() {
            return false;
        }
        self.active_id = Some(plan_id.to_string());
        self.publish();
        true
    }

    /// Appends to a day of the active plan. `None` when there is no active
    /// plan or the day does not exist in it.
    pub fn add_meal_to_day(&mut self, day_id: &str, item: NewMealItem) -> Option<MealItem> {
        let mut plan = self.active()?.clone();
        let day = plan.days.iter_mut().find(|d| d.id == day_id)?;
        let meal = item.with_id(Uuid::new_v4().to_string());
        day.meals.push(meal.clone());
        debug!(plan_id = %plan.id, %day_id, meal_id = %meal.id, "meal added");
        self.replace_plan(plan);
        Some(meal)
    }

    /// Returns `false` when there is no active plan or nothing matched.
    pub fn remove_meal_from_day(&mut self, day_id: &str, meal_id: &str) -> bool {
        let Some(active) = self.active() else {
            return false;
        };
        let mut plan = active.clone();
        let Some(day) = plan.days.iter_mut().find(|d| d.id == day_id) else {
            return false;
        };
        let before = day.meals.len();
        day.meals.retain(|m| m.id != meal_id);
        if day.meals.len() == before {
            return false;
        }
        debug!(plan_id = %plan.id, %day_id, %meal_id, "meal removed");
        self.replace_plan(plan);
        true
    }

    pub fn plans(&self) -> &[MealPlan] {
        self.plans.items()
    }

    pub fn active(&self) -> Option<&MealPlan> {
        self.active_id.as_deref().and_then(|id| self.find(id))
    }

    pub fn snapshot(&self) -> MealPlanSnapshot {
        MealPlanSnapshot {
            meal_plans: self.plans().to_vec(),
            active_meal_plan: self.active().cloned(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MealPlanSnapshot> {
        self.tx.subscribe()
    }

    fn find(&self, plan_id: &str) -> Option<&MealPlan> {
        self.plans.items().iter().find(|p| p.id == plan_id)
    }

    fn replace_plan(&mut self, plan: MealPlan) {
        let next = self
            .plans
            .items()
            .iter()
            .map(|p| if p.id == plan.id { plan.clone() } else { p.clone() })
            .collect();
        self.plans.replace(next);
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

fn required_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::validation("Plan name required"));
    }
    Ok(name.to_string())
}
