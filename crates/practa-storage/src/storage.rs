//! Scoped storage handles and the manager that issues them

use crate::backend::StorageBackend;
use crate::error::StorageError;
use crate::identity::IdentitySource;
use crate::namespace::{PractaSlug, StorageNamespace};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Size ceilings enforced before every physical write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageLimits {
    /// Maximum serialized size of one value, in bytes
    pub max_value_bytes: usize,
    /// Maximum total serialized size of one namespace, in bytes
    pub max_namespace_bytes: usize,
}

impl StorageLimits {
    /// Default per-value ceiling (10 KB)
    pub const DEFAULT_MAX_VALUE_BYTES: usize = 10_000;
    /// Default per-namespace ceiling (100 KB)
    pub const DEFAULT_MAX_NAMESPACE_BYTES: usize = 100_000;

    /// With per-value ceiling
    #[inline]
    #[must_use]
    pub fn with_max_value_bytes(mut self, bytes: usize) -> Self {
        self.max_value_bytes = bytes;
        self
    }

    /// With per-namespace ceiling
    #[inline]
    #[must_use]
    pub fn with_max_namespace_bytes(mut self, bytes: usize) -> Self {
        self.max_namespace_bytes = bytes;
        self
    }
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            max_value_bytes: Self::DEFAULT_MAX_VALUE_BYTES,
            max_namespace_bytes: Self::DEFAULT_MAX_NAMESPACE_BYTES,
        }
    }
}

/// Storage capability handed to one running unit
///
/// Every operation is confined to the handle's namespace. Values are stored
/// as JSON text.
#[derive(Clone)]
pub struct PractaStorage {
    backend: Arc<dyn StorageBackend>,
    namespace: StorageNamespace,
    limits: StorageLimits,
}

impl PractaStorage {
    /// Create handle over `backend` scoped to `namespace`
    #[must_use]
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        namespace: StorageNamespace,
        limits: StorageLimits,
    ) -> Self {
        Self {
            backend,
            namespace,
            limits,
        }
    }

    /// Namespace this handle writes to
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &StorageNamespace {
        &self.namespace
    }

    /// Limits enforced by this handle
    #[inline]
    #[must_use]
    pub fn limits(&self) -> StorageLimits {
        self.limits
    }

    /// Read and deserialize a value
    ///
    /// Returns `None` when the key is missing, when the stored text does not
    /// deserialize into `T`, and when the backend fails. Missing and corrupt
    /// data are deliberately indistinguishable to the caller; the latter two
    /// are logged.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.namespace.key(key);
        let raw = match self.backend.get_item(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "storage read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(namespace = %self.namespace, key, error = %e, "discarding unreadable stored value");
                None
            }
        }
    }

    /// Serialize and store a value
    ///
    /// # Errors
    /// - `StorageError::NotSerializable` if `value` has no JSON form
    /// - `StorageError::ValueTooLarge` if the JSON text exceeds the per-value ceiling
    /// - `StorageError::NamespaceQuotaExceeded` if the namespace would exceed its ceiling
    /// - `StorageError::Backend` if the physical write fails
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_string(value).map_err(|source| StorageError::NotSerializable {
                key: key.to_string(),
                source,
            })?;

        let size = serialized.len();
        if size > self.limits.max_value_bytes {
            tracing::warn!(namespace = %self.namespace, key, size, "rejecting oversized value");
            return Err(StorageError::ValueTooLarge {
                key: key.to_string(),
                size,
                limit: self.limits.max_value_bytes,
            });
        }

        let full_key = self.namespace.key(key);
        let others: usize = self
            .backend
            .entries_with_prefix(&self.namespace.prefix())?
            .iter()
            .filter(|(k, _)| *k != full_key)
            .map(|(_, v)| v.len())
            .sum();

        let projected = others + size;
        if projected > self.limits.max_namespace_bytes {
            tracing::warn!(namespace = %self.namespace, key, projected, "namespace quota exceeded");
            return Err(StorageError::NamespaceQuotaExceeded {
                namespace: self.namespace.prefix(),
                projected,
                limit: self.limits.max_namespace_bytes,
            });
        }

        self.backend.set_item(&full_key, serialized)?;
        tracing::debug!(namespace = %self.namespace, key, size, "stored value");
        Ok(())
    }

    /// Delete one key; removing an absent key succeeds
    ///
    /// # Errors
    /// `StorageError::Backend` if the store fails
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove_item(&self.namespace.key(key))?;
        Ok(())
    }

    /// Delete every key in this namespace
    ///
    /// # Errors
    /// `StorageError::Backend` if the store fails
    pub fn clear(&self) -> Result<(), StorageError> {
        let removed = self.backend.clear_prefix(&self.namespace.prefix())?;
        tracing::debug!(namespace = %self.namespace, removed, "cleared namespace");
        Ok(())
    }

    /// Unit-level keys currently stored
    ///
    /// # Errors
    /// `StorageError::Backend` if the store fails
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let prefix = self.namespace.prefix();
        Ok(self
            .backend
            .keys_with_prefix(&prefix)?
            .iter()
            .filter_map(|k| k.strip_prefix(prefix.as_str()).map(str::to_string))
            .collect())
    }

    /// Bytes counted against the namespace ceiling
    ///
    /// # Errors
    /// `StorageError::Backend` if the store fails
    pub fn usage(&self) -> Result<usize, StorageError> {
        Ok(self
            .backend
            .entries_with_prefix(&self.namespace.prefix())?
            .iter()
            .map(|(_, v)| v.len())
            .sum())
    }
}

impl fmt::Debug for PractaStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PractaStorage")
            .field("namespace", &self.namespace)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Issues [`PractaStorage`] handles
///
/// The identity source is consulted every time a handle is scoped, so a
/// sign-in between two Flows moves the next unit into the new user's space.
#[derive(Clone)]
pub struct StorageManager {
    backend: Arc<dyn StorageBackend>,
    identity: Arc<dyn IdentitySource>,
    limits: StorageLimits,
}

impl StorageManager {
    /// Create manager with default limits
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>, identity: Arc<dyn IdentitySource>) -> Self {
        Self {
            backend,
            identity,
            limits: StorageLimits::default(),
        }
    }

    /// With custom limits
    #[inline]
    #[must_use]
    pub fn with_limits(mut self, limits: StorageLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Handle scoped to `slug` for the current user
    #[must_use]
    pub fn scoped(&self, slug: PractaSlug) -> PractaStorage {
        let namespace = StorageNamespace::new(self.identity.current_user(), slug);
        PractaStorage::new(Arc::clone(&self.backend), namespace, self.limits)
    }

    /// Limits applied to issued handles
    #[inline]
    #[must_use]
    pub fn limits(&self) -> StorageLimits {
        self.limits
    }
}

impl fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageManager")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, MockStorageBackend};
    use crate::error::BackendError;
    use crate::identity::UserId;
    use std::collections::HashMap;

    fn storage_for(user: &str, slug: &str) -> PractaStorage {
        PractaStorage::new(
            Arc::new(MemoryBackend::new()),
            StorageNamespace::new(UserId::authenticated(user), PractaSlug::community(slug)),
            StorageLimits::default(),
        )
    }

    #[test]
    fn get_missing_is_none() {
        let storage = storage_for("u", "s");
        assert_eq!(storage.get::<String>("nope"), None);
    }

    #[test]
    fn get_wrong_shape_is_none() {
        let storage = storage_for("u", "s");
        storage.set("count", "not a number").unwrap();
        assert_eq!(storage.get::<u32>("count"), None);
    }

    #[test]
    fn get_swallows_backend_failure() {
        let mut backend = MockStorageBackend::new();
        backend
            .expect_get_item()
            .returning(|_| Err(BackendError::Unavailable("disk gone".to_string())));

        let storage = PractaStorage::new(
            Arc::new(backend),
            StorageNamespace::new(UserId::anonymous("d"), PractaSlug::builtin("journal")),
            StorageLimits::default(),
        );
        assert_eq!(storage.get::<String>("draft"), None);
    }

    #[test]
    fn set_rejects_non_string_map_keys() {
        let storage = storage_for("u", "s");
        let mut map = HashMap::new();
        map.insert((1, 2), "pair keys have no JSON form");

        let err = storage.set("bad", &map).unwrap_err();
        assert!(matches!(err, StorageError::NotSerializable { .. }));
    }

    #[test]
    fn value_ceiling_is_inclusive() {
        let storage = storage_for("u", "s");
        // 9_998 chars + 2 quotes = 10_000 bytes of JSON
        let exact = "a".repeat(9_998);
        assert!(storage.set("exact", &exact).is_ok());

        let over = "a".repeat(9_999);
        let err = storage.set("over", &over).unwrap_err();
        assert!(matches!(err, StorageError::ValueTooLarge { size: 10_001, .. }));
    }

    #[test]
    fn namespace_quota_rejects_crossing_write() {
        let storage = storage_for("u", "s");
        let chunk = "b".repeat(9_998);
        for i in 0..10 {
            storage.set(&format!("k{i}"), &chunk).unwrap();
        }
        assert_eq!(storage.usage().unwrap(), 100_000);

        let err = storage.set("k10", "x").unwrap_err();
        assert!(err.is_quota());
        assert!(storage.get::<String>("k10").is_none());
    }

    #[test]
    fn overwrite_does_not_double_count() {
        let storage = PractaStorage::new(
            Arc::new(MemoryBackend::new()),
            StorageNamespace::new(UserId::authenticated("u"), PractaSlug::community("s")),
            StorageLimits::default().with_max_namespace_bytes(25),
        );

        let value = "x".repeat(18); // 20 bytes of JSON
        storage.set("k", &value).unwrap();
        storage.set("k", &value).unwrap();
        assert_eq!(storage.usage().unwrap(), 20);
    }

    #[test]
    fn keys_are_unit_level() {
        let storage = storage_for("u", "s");
        storage.set("a", &1).unwrap();
        storage.set("b", &2).unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn manager_rescopes_on_identity() {
        let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
        let anon = StorageManager::new(
            Arc::clone(&backend),
            Arc::new(crate::StaticIdentity::new(UserId::anonymous("d1"))),
        );
        let signed_in = StorageManager::new(
            backend,
            Arc::new(crate::StaticIdentity::new(UserId::authenticated("sub-1"))),
        );

        anon.scoped(PractaSlug::builtin("journal"))
            .set("draft", "anon text")
            .unwrap();
        assert_eq!(
            signed_in
                .scoped(PractaSlug::builtin("journal"))
                .get::<String>("draft"),
            None
        );
    }
}
