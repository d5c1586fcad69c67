//! JSON-file backend
//!
//! Keeps the whole store in one JSON object on disk. Every mutation writes a
//! sibling temp file and renames it over the original, so a crash mid-write
//! leaves the previous snapshot intact.

use crate::backend::{prefix_range, StorageBackend};
use crate::error::BackendError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Durable backend persisting to a single JSON file
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileBackend {
    /// Open (or lazily create) the store at `path`
    ///
    /// # Errors
    /// - `BackendError::Io` if the file exists but cannot be read
    /// - `BackendError::Corrupt` if it is not a JSON string map
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| BackendError::io(&path, e))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).map_err(|source| BackendError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened practa store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| BackendError::io(parent, e))?;
            }
        }

        let body = serde_json::to_vec(entries)
            .map_err(|e| BackendError::Unavailable(format!("encode store: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| BackendError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| BackendError::io(&self.path, e))
    }

    /// Apply `change` to a copy, persist it, then swap it in.
    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> Result<R, BackendError> {
        let mut guard = self.entries.write();
        let mut next = guard.clone();
        let out = change(&mut next);
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }
}

impl StorageBackend for JsonFileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), BackendError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        if !self.entries.read().contains_key(key) {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BackendError> {
        let entries = self.entries.read();
        Ok(prefix_range(&entries, prefix).map(|(k, _)| k.clone()).collect())
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, BackendError> {
        self.mutate(|entries| {
            let doomed: Vec<String> =
                prefix_range(entries, prefix).map(|(k, _)| k.clone()).collect();
            for key in &doomed {
                entries.remove(key);
            }
            doomed.len()
        })
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, BackendError> {
        let entries = self.entries.read();
        Ok(prefix_range(&entries, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let backend = JsonFileBackend::open(&path).unwrap();
            backend.set_item("practa:u:s:k", "\"v\"".into()).unwrap();
        }

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("practa:u:s:k").unwrap().as_deref(),
            Some("\"v\"")
        );
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.json");

        let backend = JsonFileBackend::open(&path).unwrap();
        backend.set_item("k", "1".into()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = JsonFileBackend::open(&path);
        assert!(matches!(result, Err(BackendError::Corrupt { .. })));
    }

    #[test]
    fn clear_prefix_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let backend = JsonFileBackend::open(&path).unwrap();
        backend.set_item("practa:u:a:1", "1".into()).unwrap();
        backend.set_item("practa:u:b:1", "2".into()).unwrap();
        assert_eq!(backend.clear_prefix("practa:u:a:").unwrap(), 1);

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert!(reopened.get_item("practa:u:a:1").unwrap().is_none());
        assert!(reopened.get_item("practa:u:b:1").unwrap().is_some());
    }
}
