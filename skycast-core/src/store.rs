//! Small string key-value persistence for values that outlive the process.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

/// Key under which the last selected city is stored.
pub const CITY_KEY: &str = "city";

pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// JSON object file, rewritten whole on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Store in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read store file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse store file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize store")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("store.json"));

        assert_eq!(store.get(CITY_KEY).expect("get"), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("store.json");

        FileStore::new(&path).set(CITY_KEY, "London").expect("set");

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(CITY_KEY).expect("get").as_deref(), Some("London"));
    }

    #[test]
    fn file_store_set_keeps_other_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::new(dir.path().join("store.json"));

        store.set("units", "metric").expect("set units");
        store.set(CITY_KEY, "Lahore").expect("set city");
        store.set(CITY_KEY, "Karachi").expect("overwrite city");

        assert_eq!(store.get("units").expect("get").as_deref(), Some("metric"));
        assert_eq!(store.get(CITY_KEY).expect("get").as_deref(), Some("Karachi"));
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").expect("write");

        let err = FileStore::new(&path).get(CITY_KEY).unwrap_err();
        assert!(err.to_string().contains("Failed to parse store file"));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(CITY_KEY).expect("get"), None);

        store.set(CITY_KEY, "Paris").expect("set");
        assert_eq!(store.get(CITY_KEY).expect("get").as_deref(), Some("Paris"));
    }
}
