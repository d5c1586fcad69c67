//! Error types for Practa storage

use std::path::PathBuf;

/// Errors raised by [`crate::PractaStorage`] writes
///
/// Reads never produce these: `get` maps every failure to `None`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Value could not be serialized to JSON
    #[error("value for key '{key}' is not JSON-serializable: {source}")]
    NotSerializable {
        /// Unit-level key
        key: String,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },

    /// Serialized value is larger than the per-value ceiling
    #[error("value for key '{key}' is {size} bytes (limit {limit})")]
    ValueTooLarge {
        /// Unit-level key
        key: String,
        /// Serialized size in bytes
        size: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// Write would push the namespace over its total ceiling
    #[error("namespace '{namespace}' would hold {projected} bytes (limit {limit})")]
    NamespaceQuotaExceeded {
        /// Namespace prefix
        namespace: String,
        /// Namespace usage after the rejected write
        projected: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// Underlying store failed
    #[error("storage backend error: {0}")]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Quota errors are recoverable: the unit should keep its state in memory
    /// and carry on without persisting it.
    #[inline]
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(
            self,
            Self::ValueTooLarge { .. } | Self::NamespaceQuotaExceeded { .. }
        )
    }
}

/// Errors raised by a [`crate::StorageBackend`]
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Filesystem access failed
    #[error("io error at {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Store file exists but does not hold a string map
    #[error("corrupt store file {path}: {source}")]
    Corrupt {
        /// File being read
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Backend-specific failure
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
