use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use crate::collection::ScopedCollection;
use crate::diet_plans::dto::DietPlanDraft;
use crate::diet_plans::model::DietPlan;
use crate::error::StoreError;
use crate::meal_plans::services::MealPlanStore;
use crate::storage::{KeyValueStore, DIET_PLANS_PREFIX};

/// Saved diet plans of the current user.
pub struct DietPlanStore {
    plans: ScopedCollection<DietPlan>,
    tx: watch::Sender<Vec<DietPlan>>,
}

impl DietPlanStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            plans: ScopedCollection::new(kv, DIET_PLANS_PREFIX),
            tx,
        }
    }

    pub fn load(&mut self, user_id: Option<&str>) {
        self.plans.load(user_id);
        self.publish();
    }

    /// Saves `draft` together with a companion meal plan, which becomes the
    /// active meal plan.
    pub fn create(
        &mut self,
        draft: DietPlanDraft,
        meal_plans: &mut MealPlanStore,
    ) -> Result<DietPlan, StoreError> {
        let user_id = self
            .plans
            .owner()
            .ok_or(StoreError::NotSignedIn)?
            .to_string();
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("Plan name required"));
        }

        let meal_plan = meal_plans.create(
            &format!("{name} Meals"),
            Some(format!("Meal plan for {name} diet")),
        )?;

        let plan = DietPlan {
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            description: draft.description,
            plan_type: draft.plan_type,
            duration_days: draft.duration_days,
            daily_calories: draft.daily_calories,
            macros: draft.macros,
            meal_plan_id: Some(meal_plan.id),
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        info!(
            plan_id = %plan.id,
            user_id = %plan.user_id,
            protein = plan.macros.protein(),
            carbs = plan.macros.carbs(),
            fat = plan.macros.fat(),
            "diet plan created"
        );

        let mut next = self.plans.items().to_vec();
        next.push(plan.clone());
        self.plans.replace(next);
        self.publish();
        Ok(plan)
    }

    /// Returns `false` when nothing matched. The linked meal plan is kept.
    pub fn delete(&mut self, plan_id: &str) -> bool {
        if !self.plans.items().iter().any(|p| p.id == plan_id) {
            return false;
        }
        let next = self
            .plans
            .items()
            .iter()
            .filter(|p| p.id != plan_id)
            .cloned()
            .collect();
        self.plans.replace(next);
        info!(%plan_id, "diet plan deleted");
        self.publish();
        true
    }

    pub fn plans(&self) -> &[DietPlan] {
        self.plans.items()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<DietPlan>> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        self.tx.send_replace(self.plans.items().to_vec());
    }
}

#[cfg(test)]
mod diet_plan_tests {
    use super::*;
    use crate::diet_plans::macros::Macro;
    use crate::storage::{scoped_key, MemoryStore};

    fn stores(user: Option<&str>) -> (Arc<dyn KeyValueStore>, DietPlanStore, MealPlanStore) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut diet = DietPlanStore::new(kv.clone());
        let mut meals = MealPlanStore::new(kv.clone());
        diet.load(user);
        meals.load(user);
        (kv, diet, meals)
    }

    fn draft(name: &str) -> DietPlanDraft {
        DietPlanDraft {
            name: name.into(),
            ..DietPlanDraft::default()
        }
    }

    #[test]
    fn create_links_a_companion_meal_plan() {
        let (kv, mut diet, mut meals) = stores(Some("u1"));
        let mut d = draft("Summer Cut");
        d.macros = d.macros.rebalance_on_slider(Macro::Protein, 50);
        let plan = diet.create(d, &mut meals).unwrap();

        let active = meals.active().expect("companion plan active");
        assert_eq!(plan.meal_plan_id.as_deref(), Some(active.id.as_str()));
        assert_eq!(active.name, "Summer Cut Meals");
        assert_eq!(active.description.as_deref(), Some("Meal plan for Summer Cut diet"));
        assert_eq!(plan.macros.protein(), 50);
        assert_eq!(plan.user_id, "u1");
        assert!(kv.get(&scoped_key(DIET_PLANS_PREFIX, "u1")).unwrap().is_some());
    }

    #[test]
    fn create_validates_user_and_name() {
        let (_kv, mut diet, mut meals) = stores(None);
        assert_eq!(diet.create(draft("x"), &mut meals), Err(StoreError::NotSignedIn));

        let (_kv, mut diet, mut meals) = stores(Some("u1"));
        assert_eq!(
            diet.create(draft("   "), &mut meals),
            Err(StoreError::validation("Plan name required"))
        );
        assert!(meals.plans().is_empty());
    }

    #[test]
    fn delete_keeps_linked_meal_plan() {
        let (_kv, mut diet, mut meals) = stores(Some("u1"));
        let plan = diet.create(draft("Bulk"), &mut meals).unwrap();
        assert!(diet.delete(&plan.id));
        assert!(diet.plans().is_empty());
        assert_eq!(meals.plans().len(), 1);
        assert!(!diet.delete(&plan.id));
    }

    #[test]
    fn plans_reload_per_user() {
        let (kv, mut diet, mut meals) = stores(Some("u1"));
        diet.create(draft("Bulk"), &mut meals).unwrap();

        let mut fresh = DietPlanStore::new(kv);
        fresh.load(Some("u2"));
        assert!(fresh.plans().is_empty());
        fresh.load(Some("u1"));
        assert_eq!(fresh.plans().len(), 1);
        assert_eq!(fresh.plans()[0].name, "Bulk");
    }

    #[test]
    fn subscribers_see_created_plans() {
        let (_kv, mut diet, mut meals) = stores(Some("u1"));
        let mut rx = diet.subscribe();
        diet.create(draft("Bulk"), &mut meals).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update()[0].name, "Bulk");
    }
}
