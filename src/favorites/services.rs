use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::collection::ScopedCollection;
use crate::recipes::model::Recipe;
use crate::storage::{KeyValueStore, FAVORITES_PREFIX};

/// Saved recipes of the current user, in insertion order.
pub struct FavoritesStore {
    favorites: ScopedCollection<Recipe>,
    tx: watch::Sender<Vec<Recipe>>,
}

impl FavoritesStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (tx, _) = watch::channel(Vec::new());
        Self {
            favorites: ScopedCollection::new(kv, FAVORITES_PREFIX),
            tx,
        }
    }

    /// Discards in-memory favorites and loads those of `user_id`.
    pub fn load(&mut self, user_id: Option<&str>) {
        self.favorites.load(user_id);
        self.publish();
    }

    /// Returns `false` when the recipe was already saved.
    pub fn add(&mut self, recipe: Recipe) -> bool {
        if self.is_favorite(&recipe.id) {
            return false;
        }
        debug!(recipe_id = %recipe.id, "favorite added");
        let mut next = self.favorites.items().to_vec();
        next.push(recipe);
        self.favorites.replace(next);
        self.publish();
        true
    }

    /// Returns `false` when nothing matched.
    pub fn remove(&mut self, recipe_id: &str) -> bool {
        if !self.is_favorite(recipe_id) {
            return false;
        }
        debug!(%recipe_id, "favorite removed");
        let next = self
            .favorites
            .items()
            .iter()
            .filter(|r| r.id != recipe_id)
            .cloned()
            .collect();
        self.favorites.replace(next);
        self.publish();
        true
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.favorites.items().iter().any(|r| r.id == recipe_id)
    }

    pub fn favorites(&self) -> &[Recipe] {
        self.favorites.items()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Recipe>> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        self.tx.send_replace(self.favorites.items().to_vec());
    }
}

#[cfg(test)]
mod favorites_tests {
    use super::*;
    use crate::storage::{scoped_key, MemoryStore};

    fn recipe(id: &str) -> Recipe {
        Recipe::summary(id, format!("Recipe {id}"), format!("{id}.jpg"))
    }

    fn signed_in(kv: &Arc<dyn KeyValueStore>, user: &str) -> FavoritesStore {
        let mut store = FavoritesStore::new(kv.clone());
        store.load(Some(user));
        store
    }

    #[test]
    fn add_is_idempotent() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = signed_in(&kv, "u1");
        assert!(store.add(recipe("1")));
        let once = store.favorites().to_vec();
        assert!(!store.add(recipe("1")));
        assert_eq!(store.favorites(), once.as_slice());
        assert!(store.is_favorite("1"));
    }

    #[test]
    fn remove_absent_is_noop() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = signed_in(&kv, "u1");
        store.add(recipe("1"));
        assert!(!store.remove("missing"));
        assert_eq!(store.favorites().len(), 1);
        assert!(store.remove("1"));
        assert!(!store.is_favorite("1"));
    }

    #[test]
    fn favorites_are_scoped_per_user() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = signed_in(&kv, "u1");
        store.add(recipe("1"));
        store.add(recipe("2"));
        assert!(kv.get(&scoped_key(FAVORITES_PREFIX, "u1")).unwrap().is_some());

        store.load(Some("u2"));
        assert!(store.favorites().is_empty());
        store.add(recipe("3"));

        store.load(Some("u1"));
        let ids: Vec<_> = store.favorites().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn without_user_changes_stay_in_memory() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = FavoritesStore::new(kv.clone());
        store.load(None);
        assert!(store.add(recipe("1")));
        assert!(store.is_favorite("1"));
        assert_eq!(kv.get(&scoped_key(FAVORITES_PREFIX, "")).unwrap(), None);

        store.load(None);
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn subscribers_see_updates() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = signed_in(&kv, "u1");
        let mut rx = store.subscribe();
        store.add(recipe("9"));
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
