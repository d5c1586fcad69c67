//! Flow runner

use crate::error::HostError;
use practa_core::{CompletionSink, FlowDefinition, PractaCallbacks, PractaDefinition, UnitSignal};
use practa_flow::{FlowEngine, FlowHandle, FlowStatus};
use practa_registry::{PractaRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a unit's skip request does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// Skip this step and continue
    #[default]
    SkipStep,
    /// End the whole Flow
    AbortFlow,
}

/// Runner configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Skip handling
    pub skip_policy: SkipPolicy,
}

impl RunnerConfig {
    /// With skip policy
    #[inline]
    #[must_use]
    pub fn with_skip_policy(mut self, policy: SkipPolicy) -> Self {
        self.skip_policy = policy;
        self
    }
}

/// Host commands while a Flow runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerControl {
    /// Suspend advancement
    Pause,
    /// Continue, applying any signal received while paused
    Resume,
    /// End the Flow without the unit's cooperation
    Abort,
}

/// Sending half for [`RunnerControl`]
#[derive(Debug, Clone)]
pub struct ControlHandle {
    sender: mpsc::Sender<RunnerControl>,
}

impl ControlHandle {
    /// Control channel for [`FlowRunner::run_with_control`]
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RunnerControl>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Send a command; returns `false` once the run has finished
    pub async fn send(&self, control: RunnerControl) -> bool {
        self.sender.send(control).await.is_ok()
    }

    /// Pause
    pub async fn pause(&self) -> bool {
        self.send(RunnerControl::Pause).await
    }

    /// Resume
    pub async fn resume(&self) -> bool {
        self.send(RunnerControl::Resume).await
    }

    /// Abort
    pub async fn abort(&self) -> bool {
        self.send(RunnerControl::Abort).await
    }
}

/// Receives controls; once the channel closes it stays pending
struct ControlInbox {
    receiver: Option<mpsc::Receiver<RunnerControl>>,
}

impl ControlInbox {
    async fn next(&mut self) -> RunnerControl {
        if let Some(receiver) = self.receiver.as_mut() {
            if let Some(control) = receiver.recv().await {
                return control;
            }
            self.receiver = None;
        }
        std::future::pending().await
    }
}

enum StepOutcome {
    Signal(UnitSignal),
    Abandoned,
    Aborted,
}

/// Runs Flows end to end
///
/// One unit is active at a time. The sink is called once per completed
/// step, after the engine has recorded the output.
pub struct FlowRunner {
    registry: Arc<PractaRegistry>,
    engine: FlowEngine,
    sink: Arc<dyn CompletionSink>,
    config: RunnerConfig,
}

impl FlowRunner {
    /// Create runner
    #[must_use]
    pub fn new(
        registry: Arc<PractaRegistry>,
        engine: FlowEngine,
        sink: Arc<dyn CompletionSink>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            registry,
            engine,
            sink,
            config,
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run without host controls
    ///
    /// # Errors
    ///
    /// See [`run_with_control`](Self::run_with_control).
    pub async fn run(&self, definition: FlowDefinition) -> Result<FlowHandle, HostError> {
        self.run_inner(definition, ControlInbox { receiver: None })
            .await
    }

    /// Run, accepting pause/resume/abort from `controls`
    ///
    /// Returns the finished handle (completed or aborted) for inspection.
    ///
    /// # Errors
    ///
    /// [`HostError::Registry`] if a step has no renderer (checked before
    /// starting), [`HostError::UnitAbandoned`] if a unit drops its
    /// callbacks; the Flow is aborted first.
    pub async fn run_with_control(
        &self,
        definition: FlowDefinition,
        controls: mpsc::Receiver<RunnerControl>,
    ) -> Result<FlowHandle, HostError> {
        self.run_inner(
            definition,
            ControlInbox {
                receiver: Some(controls),
            },
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(flow_id = %definition.id, steps = definition.len()))]
    async fn run_inner(
        &self,
        definition: FlowDefinition,
        mut inbox: ControlInbox,
    ) -> Result<FlowHandle, HostError> {
        for step in &definition.practas {
            if self.registry.renderer(&step.practa_type).is_none() {
                return Err(RegistryError::MissingRenderer {
                    practa_type: step.practa_type.clone(),
                }
                .into());
            }
        }

        let mut handle = self.engine.prepare(definition);
        handle.start()?;

        while !handle.state().status().is_terminal() {
            let (Some(context), Some(step)) = (handle.current_context(), handle.current_step().cloned())
            else {
                break;
            };
            let index = context.practa_index();
            let unit = self.registry.instantiate(&step)?;
            let (callbacks, signal) = PractaCallbacks::channel(unit.capabilities());
            tracing::debug!(index, practa_type = %step.practa_type, "unit started");

            let outcome = {
                let run = unit.run(context, callbacks);
                Self::await_step(&mut handle, &mut inbox, run, signal).await?
            };

            match outcome {
                StepOutcome::Signal(UnitSignal::Completed(output)) => {
                    handle.advance(output.clone())?;
                    self.sink
                        .persist_completed_unit(&output, &step.practa_type)
                        .await;
                }
                StepOutcome::Signal(UnitSignal::Skipped) => self.apply_skip(&mut handle, &step)?,
                StepOutcome::Abandoned => {
                    let collected = handle.state().practa_outputs().len();
                    handle.abort_flow()?;
                    tracing::warn!(index, practa_type = %step.practa_type, "unit abandoned its callbacks");
                    return Err(HostError::UnitAbandoned {
                        index,
                        practa_type: step.practa_type,
                        collected,
                    });
                }
                StepOutcome::Aborted => break,
            }
        }

        Ok(handle)
    }

    async fn await_step<F>(
        handle: &mut FlowHandle,
        inbox: &mut ControlInbox,
        run: F,
        mut signal: practa_core::SignalReceiver,
    ) -> Result<StepOutcome, HostError>
    where
        F: std::future::Future<Output = ()>,
    {
        tokio::pin!(run);
        let mut run_done = false;
        let mut signal_done = false;
        let mut held: Option<UnitSignal> = None;

        loop {
            tokio::select! {
                biased;

                control = inbox.next() => match control {
                    RunnerControl::Pause => {
                        if handle.state().status() == FlowStatus::Running {
                            handle.pause()?;
                        }
                    }
                    RunnerControl::Resume => {
                        if handle.state().status() == FlowStatus::Paused {
                            handle.resume()?;
                            if let Some(signal) = held.take() {
                                return Ok(StepOutcome::Signal(signal));
                            }
                        }
                    }
                    RunnerControl::Abort => {
                        handle.abort_flow()?;
                        return Ok(StepOutcome::Aborted);
                    }
                },

                () = &mut run, if !run_done => {
                    run_done = true;
                }

                received = &mut signal, if !signal_done => {
                    signal_done = true;
                    match received {
                        Ok(signal) if handle.state().status() == FlowStatus::Paused => {
                            tracing::debug!("unit signalled while paused; holding");
                            held = Some(signal);
                        }
                        Ok(signal) => return Ok(StepOutcome::Signal(signal)),
                        Err(_) => return Ok(StepOutcome::Abandoned),
                    }
                }
            }
        }
    }

    fn apply_skip(&self, handle: &mut FlowHandle, step: &PractaDefinition) -> Result<(), HostError> {
        match self.config.skip_policy {
            SkipPolicy::SkipStep => {
                handle.skip_current()?;
            }
            SkipPolicy::AbortFlow => {
                tracing::info!(practa_type = %step.practa_type, "skip ends flow");
                handle.abort_flow()?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FlowRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowRunner")
            .field("registry", &self.registry)
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
