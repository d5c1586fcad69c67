//! Practa Core
//!
//! The contract every pluggable unit ("Practa") honors, and the data that
//! flows between units.
//!
//! # Core Concepts
//!
//! - [`Practa`]: Trait a unit implements; runs for as long as it likes
//! - [`PractaCallbacks`]: Move-only handle; the unit calls `complete` or `skip` exactly once
//! - [`PractaContext`]: Read-only input (flow id, index, previous output, storage)
//! - [`PractaOutput`]: Optional content plus optional metadata
//! - [`PractaDefinition`] / [`FlowDefinition`]: Static catalog entries and ordered Flows
//! - [`PackageDescriptor`]: Published metadata document of a community package
//! - [`CompletionSink`]: Where the host persists each completed step
//!
//! Output metadata ([`PractaMetadata`]) and the package descriptor are two
//! different things that both get called "metadata" in the wild; they are
//! kept as separate types.
//!
//! # Example
//!
//! ```rust
//! use practa_core::{Practa, PractaCallbacks, PractaContext, PractaOutput};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl Practa for Echo {
//!     async fn run(&self, context: PractaContext, callbacks: PractaCallbacks) {
//!         let text = context
//!             .previous()
//!             .and_then(|p| p.content.as_ref())
//!             .map(|c| c.value().to_string())
//!             .unwrap_or_default();
//!         callbacks.complete(PractaOutput::text(text));
//!     }
//! }
//! ```

#![warn(unreachable_pub)]

mod content;
mod context;
mod contract;
mod definition;
mod error;
mod package;
mod sink;

pub use content::{ContentSource, PractaContent, PractaMetadata, PractaOutput};
pub use context::{PractaContext, PreviousPracta};
pub use contract::{
    Practa, PractaCallbacks, PractaCapabilities, SignalReceiver, UnitFactory, UnitSignal,
};
pub use definition::{FlowDefinition, FlowId, PractaDefinition, PractaOrigin};
pub use error::ContractError;
pub use sink::{CompletionSink, NullSink};
pub use package::{
    identifier_key, migrate_descriptor, IdentifierKey, PackageDescriptor, ID_KEY, LEGACY_ID_KEY,
};

/// Re-exported so units can be written against one crate
pub use practa_storage::{PractaSlug, PractaStorage, StorageError, BUILTIN_SLUG_PREFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for unit authors
pub mod prelude {
    //! Common imports for implementing a Practa
    pub use crate::{
        ContentSource, Practa, PractaCallbacks, PractaCapabilities, PractaContent, PractaContext,
        PractaMetadata, PractaOutput, PractaStorage,
    };
}
