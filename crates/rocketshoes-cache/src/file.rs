//! File-backed store.
//!
//! All keys live in one JSON object on disk, the way a browser keeps one
//! local storage area per origin. Every write rewrites the whole file through
//! a sibling temp file and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{CacheError, KeyValueStore};

/// Key-value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open a store at `path`.
    ///
    /// The file is created lazily on first write. A file that does not hold a
    /// JSON object of strings reads as empty until the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if path.is_dir() {
            return Err(CacheError::OpenError(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        store.read_entries()?;
        tracing::debug!(path = %store.path.display(), "opened file store");
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "ignoring unreadable storage file"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn modify<F>(&self, f: F) -> Result<(), CacheError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| CacheError::StoreError("file store lock poisoned".to_string()))?;

        let mut entries = self.read_entries()?;
        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.modify(|entries| entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.read_entries()?.into_keys().collect())
    }
}
