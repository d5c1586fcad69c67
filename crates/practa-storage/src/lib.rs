//! Practa Storage
//!
//! Per-unit, per-user key/value persistence for Practa units.
//!
//! # Core Concepts
//!
//! - [`StorageBackend`]: Durable local store (`getItem`/`setItem`/`removeItem`/clear-by-prefix)
//! - [`MemoryBackend`] / [`JsonFileBackend`]: In-process and on-disk backends
//! - [`StorageNamespace`]: The `(user, slug)` pair every key is scoped to
//! - [`PractaStorage`]: Capability handle given to one running unit
//! - [`StorageManager`]: Binds backend, identity and limits; hands out handles
//!
//! Keys are physically stored as `practa:{userId}:{practaSlug}:{key}`. A
//! handle can only ever build keys under its own prefix, so a unit has no
//! way to read another unit's (or another user's) data.
//!
//! # Example
//!
//! ```rust
//! use practa_storage::{MemoryBackend, PractaSlug, StaticIdentity, StorageManager, UserId};
//! use std::sync::Arc;
//!
//! let manager = StorageManager::new(
//!     Arc::new(MemoryBackend::new()),
//!     Arc::new(StaticIdentity::new(UserId::anonymous("device-1"))),
//! );
//! let storage = manager.scoped(PractaSlug::builtin("journal"));
//!
//! storage.set("streak", &3_u32).unwrap();
//! assert_eq!(storage.get::<u32>("streak"), Some(3));
//! ```

#![warn(unreachable_pub)]

mod backend;
mod error;
mod file;
mod identity;
mod namespace;
mod storage;

pub use backend::{MemoryBackend, StorageBackend};
pub use error::{BackendError, StorageError};
pub use file::JsonFileBackend;
pub use identity::{IdentitySource, StaticIdentity, UserId, ANONYMOUS_PREFIX};
pub use namespace::{PractaSlug, StorageNamespace, BUILTIN_SLUG_PREFIX, KEY_ROOT};
pub use storage::{PractaStorage, StorageLimits, StorageManager};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
