//! Persistence seam for completed steps

use crate::content::PractaOutput;
use async_trait::async_trait;

/// Receives each completed step's output
///
/// Called by the host once per completed (not skipped) step, in step
/// order. Sinks own their failure handling.
#[async_trait]
pub trait CompletionSink: Send + Sync {
    /// Persist one step's output
    async fn persist_completed_unit(&self, output: &PractaOutput, unit_type: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl CompletionSink for NullSink {
    async fn persist_completed_unit(&self, _output: &PractaOutput, unit_type: &str) {
        tracing::trace!(unit_type, "completion discarded");
    }
}
