//! Error types for Flow execution

use crate::status::FlowStatus;
use thiserror::Error;

/// Result alias for Flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors from the Flow engine
///
/// All variants are caller errors: the host drove the Flow out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Operation on a completed or aborted Flow
    #[error("flow is {status}; no further operations are allowed")]
    Terminal {
        /// Terminal status
        status: FlowStatus,
    },

    /// Transition not in the state table
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        /// Current status
        from: FlowStatus,
        /// Requested status
        to: FlowStatus,
    },

    /// Step operation while the Flow is not running
    #[error("flow is {status}; steps can only be applied while running")]
    NotRunning {
        /// Current status
        status: FlowStatus,
    },

    /// Journal hash chain does not verify
    #[error("journal integrity violation at entry {sequence}")]
    JournalIntegrity {
        /// First bad entry
        sequence: u64,
    },
}

impl FlowError {
    /// Check if the Flow had already ended
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }
}
