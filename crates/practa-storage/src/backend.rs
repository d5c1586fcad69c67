//! Storage backend trait and in-memory implementation

use crate::error::BackendError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Durable local key/value store underlying [`crate::PractaStorage`]
///
/// Every call is atomic on its own; there is no multi-key transaction.
/// Concurrent writers to the same key resolve last-write-wins.
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend: Send + Sync {
    /// Read a raw value
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Write a raw value, replacing any previous one
    fn set_item(&self, key: &str, value: String) -> Result<(), BackendError>;

    /// Delete a key; absent keys are not an error
    fn remove_item(&self, key: &str) -> Result<(), BackendError>;

    /// List every key starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BackendError>;

    /// Delete every key starting with `prefix`, returning how many were removed
    fn clear_prefix(&self, prefix: &str) -> Result<usize, BackendError>;

    /// Key/value pairs under `prefix`
    ///
    /// The default walks [`keys_with_prefix`](Self::keys_with_prefix); keys
    /// deleted between the scan and the read are skipped.
    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, BackendError> {
        let mut entries = Vec::new();
        for key in self.keys_with_prefix(prefix)? {
            if let Some(value) = self.get_item(&key)? {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

/// In-process backend
///
/// Ordered map so prefix scans are range scans. Not durable; used by tests,
/// simulations and hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Create empty backend
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys across all namespaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

pub(crate) fn prefix_range<'a, V>(
    map: &'a BTreeMap<String, V>,
    prefix: &'a str,
) -> impl Iterator<Item = (&'a String, &'a V)> + 'a {
    map.range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
        .take_while(move |(k, _)| k.starts_with(prefix))
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), BackendError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, BackendError> {
        let entries = self.entries.read();
        Ok(prefix_range(&entries, prefix).map(|(k, _)| k.clone()).collect())
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, BackendError> {
        let mut entries = self.entries.write();
        let doomed: Vec<String> = prefix_range(&entries, prefix).map(|(k, _)| k.clone()).collect();
        for key in &doomed {
            entries.remove(key);
        }
        Ok(doomed.len())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, BackendError> {
        let entries = self.entries.read();
        Ok(prefix_range(&entries, prefix)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
