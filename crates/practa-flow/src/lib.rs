//! Practa Flow
//!
//! Runs an ordered [`FlowDefinition`](practa_core::FlowDefinition) one unit
//! at a time, threading each step's output into the next step's context.
//!
//! # State machine
//!
//! ```text
//! idle ──start──▶ running ──advance/skip (last step)──▶ completed
//!                  │  ▲  │
//!              pause  resume
//!                  ▼  │  │
//!                 paused │
//!                    │   │
//!                    └───┴──abort──▶ aborted
//! ```
//!
//! `completed` and `aborted` are terminal; any further operation returns
//! [`FlowError::Terminal`].
//!
//! # Example
//!
//! ```rust
//! use practa_core::{FlowDefinition, PractaDefinition, PractaOutput};
//! use practa_flow::{EngineConfig, FlowEngine, FlowStatus};
//!
//! let definition = FlowDefinition::new(
//!     "Evening",
//!     vec![
//!         PractaDefinition::builtin("journal-0", "journal", "Journal"),
//!         PractaDefinition::builtin("silent-meditation-1", "silent-meditation", "Sit"),
//!     ],
//! );
//! let engine = FlowEngine::new(EngineConfig::default());
//! let mut flow = engine.start_flow(definition).unwrap();
//!
//! flow.advance(PractaOutput::text("hello")).unwrap();
//! let context = flow.current_context().unwrap();
//! assert_eq!(context.previous().unwrap().content.as_ref().unwrap().value(), "hello");
//!
//! flow.advance(PractaOutput::empty()).unwrap();
//! assert_eq!(flow.state().status(), FlowStatus::Completed);
//! ```

#![warn(unreachable_pub)]

mod engine;
mod error;
mod journal;
pub mod state_machine;
mod status;
mod state;

pub use engine::{EngineConfig, FlowEngine, FlowEvent, FlowHandle};
pub use error::{FlowError, Result};
pub use journal::{FlowJournal, JournalAction, JournalEntry};
pub use state::FlowExecutionState;
pub use status::FlowStatus;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
