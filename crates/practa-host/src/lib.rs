//! Practa Host
//!
//! Drives Flows end to end: instantiates each step's unit through the
//! registry, waits for its callback, applies it to the engine, and hands
//! completed outputs to a [`CompletionSink`].
//!
//! # Example
//!
//! ```rust,no_run
//! use practa_core::NullSink;
//! use practa_flow::{EngineConfig, FlowEngine};
//! use practa_host::{simulation_registry, FlowRunner, RunnerConfig};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), practa_host::HostError> {
//! let registry = Arc::new(simulation_registry());
//! let definition = registry.create_single_flow("breathing")?;
//! let runner = FlowRunner::new(
//!     registry,
//!     FlowEngine::new(EngineConfig::default()),
//!     Arc::new(NullSink),
//!     RunnerConfig::default(),
//! );
//! let finished = runner.run(definition).await?;
//! assert!(finished.state().status().is_terminal());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

mod config;
mod error;
mod runner;
mod simulate;

pub use config::{ConfigError, HostConfig, CONFIG_ENV};
pub use error::HostError;
pub use runner::{ControlHandle, FlowRunner, RunnerConfig, RunnerControl, SkipPolicy};
pub use simulate::{simulation_registry, SimulatedPracta};

pub use practa_core::CompletionSink;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
