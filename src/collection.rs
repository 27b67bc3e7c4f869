use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::storage::{scoped_key, KeyValueStore};

/// A per-user list of entities serialized wholesale under `<prefix><user_id>`.
///
/// With no owner the items live only in memory and are never written.
pub struct ScopedCollection<T> {
    kv: Arc<dyn KeyValueStore>,
    prefix: &'static str,
    owner: Option<String>,
    items: Vec<T>,
}

impl<T> ScopedCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(kv: Arc<dyn KeyValueStore>, prefix: &'static str) -> Self {
        Self {
            kv,
            prefix,
            owner: None,
            items: Vec::new(),
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Switches the owner and reloads from their record. A missing or
    /// unreadable record yields an empty collection.
    pub fn load(&mut self, owner: Option<&str>) {
        self.owner = owner.map(str::to_string);
        self.items = match owner {
            Some(user_id) => self.read(user_id),
            None => Vec::new(),
        };
    }

    /// Replaces every item and persists the new snapshot.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.persist();
    }

    fn read(&self, user_id: &str) -> Vec<T> {
        let key = scoped_key(self.prefix, user_id);
        let raw = match self.kv.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, %key, "failed to read collection");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(%key, count = items.len(), "collection loaded");
                items
            }
            Err(e) => {
                warn!(error = %e, %key, "discarding malformed collection");
                Vec::new()
            }
        }
    }

    fn persist(&self) {
        let Some(user_id) = self.owner.as_deref() else {
            return;
        };
        let key = scoped_key(self.prefix, user_id);
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, %key, "failed to serialize collection");
                return;
            }
        };
        if let Err(e) = self.kv.set(&key, &json) {
            warn!(error = %e, %key, "failed to persist collection");
        }
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;
    use crate::storage::MemoryStore;

    const PREFIX: &str = "test_items_";

    fn kv() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn replace_persists_only_with_owner() {
        let kv = kv();
        let mut coll = ScopedCollection::<String>::new(kv.clone(), PREFIX);

        coll.replace(vec!["a".into()]);
        assert_eq!(coll.items(), ["a".to_string()]);
        assert_eq!(kv.get("test_items_").unwrap(), None);

        coll.load(Some("u1"));
        assert!(coll.items().is_empty());
        coll.replace(vec!["b".into()]);
        assert_eq!(kv.get("test_items_u1").unwrap().as_deref(), Some(r#"["b"]"#));
    }

    #[test]
    fn load_switches_between_owners() {
        let kv = kv();
        kv.set("test_items_u1", r#"["x"]"#).unwrap();
        kv.set("test_items_u2", r#"["y","z"]"#).unwrap();

        let mut coll = ScopedCollection::<String>::new(kv, PREFIX);
        coll.load(Some("u1"));
        assert_eq!(coll.items(), ["x".to_string()]);
        coll.load(Some("u2"));
        assert_eq!(coll.items().len(), 2);
        coll.load(None);
        assert!(coll.items().is_empty());
        assert_eq!(coll.owner(), None);
    }

    #[test]
    fn malformed_record_falls_back_to_empty() {
        let kv = kv();
        kv.set("test_items_u1", "{not json").unwrap();
        let mut coll = ScopedCollection::<String>::new(kv, PREFIX);
        coll.load(Some("u1"));
        assert!(coll.items().is_empty());
        assert_eq!(coll.owner(), Some("u1"));
    }

    #[test]
    fn out_of_range_macro_shares_load_normalized() {
        use crate::diet_plans::macros::MacroBreakdown;

        let kv = kv();
        kv.set(
            "test_items_u1",
            r#"[{"protein":30000000,"carbs":1,"fat":1},{"protein":4294967295,"carbs":4294967295,"fat":0}]"#,
        )
        .unwrap();
        let mut coll = ScopedCollection::<MacroBreakdown>::new(kv, PREFIX);
        coll.load(Some("u1"));
        let shares: Vec<(u32, u32, u32)> = coll
            .items()
            .iter()
            .map(|m| (m.protein(), m.carbs(), m.fat()))
            .collect();
        assert_eq!(shares, vec![(100, 0, 0), (50, 50, 0)]);
    }
}
