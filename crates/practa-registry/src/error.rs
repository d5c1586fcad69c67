//! Error types for registry operations

use thiserror::Error;

/// Result alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors from the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No catalog entry for the type
    #[error("unknown practa type: {practa_type}")]
    UnknownPractaType {
        /// Requested type
        practa_type: String,
    },

    /// Type already registered
    #[error("practa type already registered: {practa_type}")]
    DuplicateType {
        /// Colliding type
        practa_type: String,
    },

    /// Community id falls in the first-party slug range
    #[error("practa id `{id}` uses the reserved builtin prefix")]
    ReservedIdentifier {
        /// Rejected id
        id: String,
    },

    /// Type is cataloged but nothing can run it
    #[error("no renderer bound for practa type: {practa_type}")]
    MissingRenderer {
        /// Type without a renderer
        practa_type: String,
    },
}

impl RegistryError {
    /// Create unknown type error
    #[must_use]
    pub fn unknown(practa_type: impl Into<String>) -> Self {
        Self::UnknownPractaType {
            practa_type: practa_type.into(),
        }
    }
}
