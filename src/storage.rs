#[cfg(test)]
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::RwLock;

use anyhow::Context;

pub const USER_KEY: &str = "culinary_user";
pub const FAVORITES_PREFIX: &str = "culinary_favorites_";
pub const MEAL_PLANS_PREFIX: &str = "culinary_meal_plans_";
pub const DIET_PLANS_PREFIX: &str = "culinary_diet_plans_";

/// Builds the per-user key for a scoped collection.
pub fn scoped_key(prefix: &str, user_id: &str) -> String {
    format!("{prefix}{user_id}")
}

/// Synchronous string key-value persistence. Writes are last-write-wins per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create data dir {}", root.display()))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value).with_context(|| format!("write {}", path.display()))
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

/// In-process store backing `AppState::fake`.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    #[test]
    fn scoped_key_appends_user_id() {
        assert_eq!(
            scoped_key(FAVORITES_PREFIX, "42"),
            "culinary_favorites_42"
        );
    }

    #[test]
    fn sanitize_key_replaces_path_characters() {
        assert_eq!(sanitize_key("culinary_user"), "culinary_user");
        assert_eq!(sanitize_key("../etc/passwd"), "___etc_passwd");
    }

    #[test]
    fn file_store_set_get_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("data")).expect("open");

        assert_eq!(store.get(USER_KEY).unwrap(), None);
        store.set(USER_KEY, r#"{"id":"1"}"#).unwrap();
        assert_eq!(store.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":"1"}"#));

        store.set(USER_KEY, "[]").unwrap();
        assert_eq!(store.get(USER_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(USER_KEY).unwrap();
        assert_eq!(store.get(USER_KEY).unwrap(), None);
        // removing twice is fine
        store.remove(USER_KEY).unwrap();
    }

    #[test]
    fn memory_store_is_last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("b"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
