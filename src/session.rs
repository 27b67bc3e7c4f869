use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::auth::services::IdentityStore;
use crate::diet_plans::services::DietPlanStore;
use crate::favorites::services::FavoritesStore;
use crate::meal_plans::services::MealPlanStore;
use crate::storage::KeyValueStore;

/// All per-user state of the app. Signing in or out reloads every scoped
/// store for the new user; nothing is carried over between users.
pub struct Session {
    pub identity: IdentityStore,
    pub favorites: FavoritesStore,
    pub meal_plans: MealPlanStore,
    pub diet_plans: DietPlanStore,
}

impl Session {
    /// Restores the persisted user and loads their collections.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let mut session = Self {
            identity: IdentityStore::new(kv.clone()),
            favorites: FavoritesStore::new(kv.clone()),
            meal_plans: MealPlanStore::new(kv.clone()),
            diet_plans: DietPlanStore::new(kv),
        };
        session.identity.restore();
        session.reload();
        session
    }

    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let ok = self.identity.login(email, password);
        if ok {
            self.reload();
        }
        ok
    }

    pub fn signup(&mut self, name: &str, email: &str, password: &str) -> bool {
        let ok = self.identity.signup(name, email, password);
        if ok {
            self.reload();
        }
        ok
    }

    pub fn logout(&mut self) {
        self.identity.logout();
        self.reload();
    }

    /// Logs every change the stores publish. Each task ends once its store
    /// is dropped.
    pub fn spawn_change_log(&self) -> Vec<JoinHandle<()>> {
        let mut auth = self.identity.subscribe();
        let mut favorites = self.favorites.subscribe();
        let mut meal_plans = self.meal_plans.subscribe();
        let mut diet_plans = self.diet_plans.subscribe();
        vec![
            tokio::spawn(async move {
                while auth.changed().await.is_ok() {
                    let (authenticated, user_id) = {
                        let state = auth.borrow_and_update();
                        (state.is_authenticated, state.user.as_ref().map(|u| u.id.clone()))
                    };
                    debug!(authenticated, user_id = ?user_id, "auth state changed");
                }
            }),
            tokio::spawn(async move {
                while favorites.changed().await.is_ok() {
                    let count = favorites.borrow_and_update().len();
                    debug!(count, "favorites changed");
                }
            }),
            tokio::spawn(async move {
                while meal_plans.changed().await.is_ok() {
                    let (count, active) = {
                        let snap = meal_plans.borrow_and_update();
                        let active = snap.active_meal_plan.as_ref().map(|p| p.id.clone());
                        (snap.meal_plans.len(), active)
                    };
                    debug!(count, active = ?active, "meal plans changed");
                }
            }),
            tokio::spawn(async move {
                while diet_plans.changed().await.is_ok() {
                    let count = diet_plans.borrow_and_update().len();
                    debug!(count, "diet plans changed");
                }
            }),
        ]
    }

    fn reload(&mut self) {
        let user_id = self.identity.user_id();
        debug!(user_id = ?user_id, "reloading per-user stores");
        self.favorites.load(user_id.as_deref());
        self.meal_plans.load(user_id.as_deref());
        self.diet_plans.load(user_id.as_deref());
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use crate::recipes::model::Recipe;
    use crate::storage::MemoryStore;

    #[test]
    fn switching_users_swaps_every_store() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = Session::open(kv.clone());
        assert!(!session.identity.snapshot().is_authenticated);

        assert!(session.login("ana@example.com", "pw"));
        session.favorites.add(Recipe::summary("1", "Pie", "pie.jpg"));
        session.meal_plans.create("Week", None).unwrap();

        assert!(session.login("ben@example.com", "pw"));
        assert!(session.favorites.favorites().is_empty());
        assert!(session.meal_plans.plans().is_empty());
        assert!(session.meal_plans.active().is_none());

        session.logout();
        assert!(session.favorites.favorites().is_empty());
        assert!(session.meal_plans.create("x", None).is_err());

        assert!(session.login("ana@example.com", "pw"));
        assert!(session.favorites.is_favorite("1"));
        assert_eq!(session.meal_plans.active().unwrap().name, "Week");
    }

    #[test]
    fn reopening_restores_the_signed_in_user() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = Session::open(kv.clone());
        assert!(session.signup("Alex", "alex@example.com", "x"));
        session.favorites.add(Recipe::summary("7", "Soup", "soup.jpg"));

        let reopened = Session::open(kv);
        let user = reopened.identity.user().unwrap();
        assert_eq!(user.name, "Alex");
        assert_eq!(user.email, "alex@example.com");
        assert!(reopened.favorites.is_favorite("7"));
    }

    #[test]
    fn failed_login_keeps_current_state() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = Session::open(kv);
        assert!(session.login("ana@example.com", "pw"));
        session.favorites.add(Recipe::summary("1", "Pie", "pie.jpg"));
        assert!(!session.login("ben@example.com", ""));
        assert!(session.favorites.is_favorite("1"));
    }

    #[test]
    fn reopening_survives_oversized_persisted_macros() {
        use crate::diet_plans::dto::DietPlanDraft;
        use crate::storage::{scoped_key, DIET_PLANS_PREFIX};

        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = Session::open(kv.clone());
        assert!(session.login("ana@example.com", "pw"));
        let draft = DietPlanDraft {
            name: "Cut".into(),
            ..DietPlanDraft::default()
        };
        let session = &mut session;
        session
            .diet_plans
            .create(draft, &mut session.meal_plans)
            .unwrap();

        let user_id = session.identity.user_id().unwrap();
        let key = scoped_key(DIET_PLANS_PREFIX, &user_id);
        let mut stored: serde_json::Value =
            serde_json::from_str(&kv.get(&key).unwrap().unwrap()).unwrap();
        stored[0]["macros"] = serde_json::json!({"protein": 30000000, "carbs": 1, "fat": 1});
        kv.set(&key, &stored.to_string()).unwrap();

        let reopened = Session::open(kv);
        let plans = reopened.diet_plans.plans();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].macros.protein(), 100);
    }

    #[tokio::test]
    async fn change_log_tasks_stop_with_the_session() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut session = Session::open(kv);
        let tasks = session.spawn_change_log();
        assert_eq!(tasks.len(), 4);

        assert!(session.login("ana@example.com", "pw"));
        session.favorites.add(Recipe::summary("1", "Pie", "pie.jpg"));
        session.meal_plans.create("Week", None).unwrap();
        drop(session);

        for task in tasks {
            tokio::time::timeout(std::time::Duration::from_secs(1), task)
                .await
                .expect("task ends once its store is gone")
                .unwrap();
        }
    }
}
