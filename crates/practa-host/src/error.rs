//! Error types for the host driver

use practa_flow::FlowError;
use practa_registry::RegistryError;
use thiserror::Error;

/// Errors from running a Flow
#[derive(Debug, Error)]
pub enum HostError {
    /// Engine rejected an operation
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),

    /// Step could not be resolved or instantiated
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Unit dropped its callbacks without completing or skipping
    #[error("unit `{practa_type}` at step {index} ended without signalling")]
    UnitAbandoned {
        /// Step index
        index: usize,
        /// Unit type
        practa_type: String,
        /// Outputs collected before the step
        collected: usize,
    },
}

impl HostError {
    /// Check if the error came from a unit rather than the host
    #[inline]
    #[must_use]
    pub fn is_unit_fault(&self) -> bool {
        matches!(self, Self::UnitAbandoned { .. })
    }
}
