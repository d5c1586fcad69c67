//! The unit contract
//!
//! A unit receives a [`PractaContext`] and a [`PractaCallbacks`] handle.
//! The handle is consumed by `complete` or `skip`, so a unit can signal at
//! most once. Dropping it without signalling is observable by the host as
//! an abandoned step.

use crate::content::PractaOutput;
use crate::context::PractaContext;
use crate::definition::PractaDefinition;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;

/// What a unit is allowed to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PractaCapabilities {
    /// Host shows a skip affordance and honors `skip`
    pub can_skip: bool,
}

impl PractaCapabilities {
    /// Skippable unit
    #[inline]
    #[must_use]
    pub fn skippable() -> Self {
        Self { can_skip: true }
    }
}

/// Final signal a unit sends
#[derive(Debug, Clone, PartialEq)]
pub enum UnitSignal {
    /// Finished with output
    Completed(PractaOutput),
    /// Asked to be skipped
    Skipped,
}

/// Receiving half held by the host
pub type SignalReceiver = oneshot::Receiver<UnitSignal>;

/// Move-only completion handle given to a unit
#[derive(Debug)]
pub struct PractaCallbacks {
    sender: oneshot::Sender<UnitSignal>,
    can_skip: bool,
}

impl PractaCallbacks {
    /// Create a handle and the receiver the host waits on
    #[must_use]
    pub fn channel(capabilities: PractaCapabilities) -> (Self, SignalReceiver) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender,
                can_skip: capabilities.can_skip,
            },
            receiver,
        )
    }

    /// Whether `skip` will be honored
    #[inline]
    #[must_use]
    pub fn can_skip(&self) -> bool {
        self.can_skip
    }

    /// Report completion
    ///
    /// If the host already stopped listening (Flow aborted), the output is
    /// discarded.
    pub fn complete(self, output: PractaOutput) {
        if self.sender.send(UnitSignal::Completed(output)).is_err() {
            tracing::debug!("completion arrived after host stopped listening");
        }
    }

    /// Ask to be skipped
    ///
    /// Units without the skip capability get the handle back unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` if the unit was not declared skippable.
    pub fn skip(self) -> Result<(), Self> {
        if !self.can_skip {
            return Err(self);
        }
        if self.sender.send(UnitSignal::Skipped).is_err() {
            tracing::debug!("skip arrived after host stopped listening");
        }
        Ok(())
    }
}

/// A pluggable step
#[async_trait]
pub trait Practa: Send + Sync {
    /// Capabilities the host should advertise for this unit
    fn capabilities(&self) -> PractaCapabilities {
        PractaCapabilities::default()
    }

    /// Run until the user is done, then signal through `callbacks`
    async fn run(&self, context: PractaContext, callbacks: PractaCallbacks);
}

/// Builds a unit implementation for a catalog entry
pub type UnitFactory = Arc<dyn Fn(&PractaDefinition) -> Box<dyn Practa> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FlowId;

    struct Finisher;

    #[async_trait]
    impl Practa for Finisher {
        async fn run(&self, context: PractaContext, callbacks: PractaCallbacks) {
            callbacks.complete(PractaOutput::text(format!("step {}", context.practa_index())));
        }
    }

    #[tokio::test]
    async fn complete_reaches_host() {
        let (callbacks, receiver) = PractaCallbacks::channel(Finisher.capabilities());
        Finisher
            .run(PractaContext::new(FlowId::new("f"), 2, None), callbacks)
            .await;

        assert_eq!(
            receiver.await.unwrap(),
            UnitSignal::Completed(PractaOutput::text("step 2"))
        );
    }

    #[tokio::test]
    async fn skip_requires_capability() {
        let (callbacks, mut receiver) = PractaCallbacks::channel(PractaCapabilities::default());
        let callbacks = callbacks.skip().unwrap_err();
        assert!(receiver.try_recv().is_err());

        callbacks.complete(PractaOutput::empty());
        assert_eq!(receiver.await.unwrap(), UnitSignal::Completed(PractaOutput::empty()));
    }

    #[tokio::test]
    async fn skip_when_allowed() {
        let (callbacks, receiver) = PractaCallbacks::channel(PractaCapabilities::skippable());
        assert!(callbacks.can_skip());
        callbacks.skip().unwrap();
        assert_eq!(receiver.await.unwrap(), UnitSignal::Skipped);
    }

    #[tokio::test]
    async fn dropped_handle_is_observable() {
        let (callbacks, receiver) = PractaCallbacks::channel(PractaCapabilities::default());
        drop(callbacks);
        assert!(receiver.await.is_err());
    }

    #[test]
    fn late_signal_is_discarded() {
        let (callbacks, receiver) = PractaCallbacks::channel(PractaCapabilities::default());
        drop(receiver);
        callbacks.complete(PractaOutput::text("too late"));
    }
}
