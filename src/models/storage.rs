use crate::config::StorageKeys;
use crate::error::{Result, ShelfError};
use crate::models::{Category, Snippet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Text key-value store the collections are persisted into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ShelfError::Storage(format!("invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write next to the target then rename so a crash never leaves half a file
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Volatile store, mostly for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Persistence adapter between the in-memory collections and a
/// [`KeyValueStore`]. Store failures are logged here and never reach the
/// caller: a broken store just means nothing gets persisted.
#[derive(Debug)]
pub struct StorageManager<S: KeyValueStore> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> StorageManager<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize `items` and write them under `key`. Returns whether the
    /// write went through.
    pub fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> bool {
        let content = match serde_json::to_string(items) {
            Ok(content) => content,
            Err(e) => {
                log::error!("failed to serialize collection '{}': {}", key, e);
                return false;
            }
        };

        match self.store.set(key, &content) {
            Ok(()) => true,
            Err(e) => {
                log::error!("failed to save collection '{}': {}", key, e);
                false
            }
        }
    }

    /// Read the collection under `key`; absent or unreadable data yields an
    /// empty list, and records that fail to decode are skipped.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let content = match self.store.get(key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::error!("failed to load collection '{}': {}", key, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        let records: Vec<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("discarding unreadable collection '{}': {}", key, e);
                return Vec::new();
            }
        };

        // A bad record only costs itself, never its neighbours
        records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| match serde_json::from_value(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    log::warn!("skipping record {} of collection '{}': {}", idx, key, e);
                    None
                }
            })
            .collect()
    }

    pub fn save_snippets(&mut self, snippets: &[Snippet]) -> bool {
        let key = self.keys.snippets.clone();
        self.save(&key, snippets)
    }

    pub fn load_snippets(&self) -> Vec<Snippet> {
        self.load(&self.keys.snippets)
    }

    pub fn save_categories(&mut self, categories: &[Category]) -> bool {
        let key = self.keys.categories.clone();
        self.save(&key, categories)
    }

    pub fn load_categories(&self) -> Vec<Category> {
        self.load(&self.keys.categories)
    }

    /// Remove both collections from the store.
    pub fn clear_all(&mut self) {
        for key in [self.keys.snippets.clone(), self.keys.categories.clone()] {
            if let Err(e) = self.store.remove(&key) {
                log::error!("failed to remove collection '{}': {}", key, e);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SnippetLanguage;

    /// Store whose every operation fails, like a full or locked disk.
    #[derive(Debug, Default)]
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(ShelfError::Storage("store unavailable".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(ShelfError::Storage("quota exceeded".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(ShelfError::Storage("store unavailable".into()))
        }
    }

    fn snippet(title: &str) -> Snippet {
        Snippet::new(
            title.into(),
            "code".into(),
            SnippetLanguage::Python,
            "c".into(),
            vec![],
        )
    }

    #[test]
    fn file_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("code_snippets").unwrap(), None);
        store.set("code_snippets", "[1,2]").unwrap();
        assert_eq!(store.get("code_snippets").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested/code_snippets.json").exists());

        store.set("code_snippets", "[]").unwrap();
        assert_eq!(store.get("code_snippets").unwrap().as_deref(), Some("[]"));

        store.remove("code_snippets").unwrap();
        store.remove("code_snippets").unwrap();
        assert_eq!(store.get("code_snippets").unwrap(), None);
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn missing_key_loads_empty() {
        let manager = StorageManager::new(MemoryStore::new(), StorageKeys::default());
        assert!(manager.load_snippets().is_empty());
        assert!(manager.load_categories().is_empty());
    }

    #[test]
    fn corrupt_collection_loads_empty() {
        let mut store = MemoryStore::new();
        store.set("code_snippets", "{not json").unwrap();
        let manager = StorageManager::new(store, StorageKeys::default());
        assert!(manager.load_snippets().is_empty());
    }

    #[test]
    fn malformed_record_does_not_drop_its_neighbours() {
        let mut store = MemoryStore::new();
        store
            .set(
                "code_categories",
                r##"[
                    {"id": "c1", "name": "Mine", "description": "kept", "color": "#123456"},
                    {"id": "c2", "name": "Bad", "description": null, "color": "#000000"},
                    {"id": "c3", "name": "Also mine"}
                ]"##,
            )
            .unwrap();
        let manager = StorageManager::new(store, StorageKeys::default());

        let ids: Vec<_> = manager.load_categories().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
    }

    #[test]
    fn saves_under_configured_keys() {
        let keys = StorageKeys {
            snippets: "s".into(),
            categories: "c".into(),
        };
        let mut manager = StorageManager::new(MemoryStore::new(), keys);
        assert!(manager.save_snippets(&[snippet("one"), snippet("two")]));
        assert!(manager.save_categories(&[]));

        assert!(manager.store().get("s").unwrap().is_some());
        assert_eq!(manager.store().get("c").unwrap().as_deref(), Some("[]"));
        let loaded = manager.load_snippets();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].title, "two");
    }

    #[test]
    fn broken_store_degrades_silently() {
        let mut manager = StorageManager::new(BrokenStore, StorageKeys::default());
        assert!(!manager.save_snippets(&[snippet("lost")]));
        assert!(manager.load_snippets().is_empty());
        manager.clear_all();
    }

    #[test]
    fn clear_all_removes_both_keys() {
        let mut manager = StorageManager::new(MemoryStore::new(), StorageKeys::default());
        manager.save_snippets(&[snippet("one")]);
        manager.save_categories(&[]);
        assert_eq!(manager.store().len(), 2);
        manager.clear_all();
        assert!(manager.store().is_empty());
    }
}
