//! Practa Registry
//!
//! Maps unit type identifiers to catalog definitions and renderer
//! factories, and builds [`FlowDefinition`](practa_core::FlowDefinition)s
//! from lists of types.
//!
//! First-party and community entries share one identifier space. The
//! origin is kept on each definition for listings only; the engine treats
//! both the same.
//!
//! # Example
//!
//! ```rust
//! use practa_registry::{FlowOverrides, PractaRegistry};
//!
//! let registry = PractaRegistry::with_builtins();
//! let flow = registry
//!     .create_flow("Evening", &["journal", "silent-meditation"], FlowOverrides::default())
//!     .unwrap();
//! assert_eq!(flow.len(), 2);
//! ```

#![warn(unreachable_pub)]

mod catalog;
mod error;
mod registry;

pub use catalog::{builtin_definitions, BUILTIN_TYPES};
pub use error::{RegistryError, Result};
pub use registry::{CatalogEntry, FlowOverrides, OriginBadge, PractaRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
