//! Flow engine and per-run handle

use crate::error::{FlowError, Result};
use crate::journal::{FlowJournal, JournalAction};
use crate::state::FlowExecutionState;
use crate::state_machine::validate_transition;
use crate::status::FlowStatus;
use practa_core::{
    FlowDefinition, FlowId, PractaContext, PractaDefinition, PractaOutput, PreviousPracta,
};
use practa_storage::StorageManager;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Buffered events per subscriber before slow receivers lag
    pub event_capacity: usize,
}

impl EngineConfig {
    /// Default event buffer
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    /// With event buffer size
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Notifications for progress UI and persistence
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// Any status change or step transition
    StateChanged(FlowExecutionState),
    /// All steps done; outputs in step order
    Completed {
        /// Flow run
        flow_id: FlowId,
        /// Every output
        outputs: Vec<PractaOutput>,
    },
    /// Stopped early; outputs collected before the abort
    Aborted {
        /// Flow run
        flow_id: FlowId,
        /// Partial outputs
        outputs: Vec<PractaOutput>,
    },
}

/// Creates Flow runs
#[derive(Debug, Clone, Default)]
pub struct FlowEngine {
    config: EngineConfig,
    storage: Option<StorageManager>,
}

impl FlowEngine {
    /// Create engine
    #[inline]
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            storage: None,
        }
    }

    /// With storage handed to every unit context
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, storage: StorageManager) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Idle handle for a definition
    #[must_use]
    pub fn prepare(&self, definition: FlowDefinition) -> FlowHandle {
        let (events, _) = broadcast::channel(self.config.event_capacity.max(1));
        FlowHandle {
            state: FlowExecutionState::new(definition),
            events,
            journal: FlowJournal::default(),
            storage: self.storage.clone(),
        }
    }

    /// Prepare and start
    ///
    /// # Errors
    ///
    /// Never fails for a freshly prepared handle; the `Result` mirrors
    /// [`FlowHandle::start`].
    pub fn start_flow(&self, definition: FlowDefinition) -> Result<FlowHandle> {
        let mut handle = self.prepare(definition);
        handle.start()?;
        Ok(handle)
    }
}

/// One Flow run
///
/// Exactly one step is active while running. Output for step `i` is
/// recorded before the context for step `i + 1` can be built.
#[derive(Debug)]
pub struct FlowHandle {
    state: FlowExecutionState,
    events: broadcast::Sender<FlowEvent>,
    journal: FlowJournal,
    storage: Option<StorageManager>,
}

impl FlowHandle {
    /// Begin at step 0; an empty Flow completes immediately
    ///
    /// # Errors
    ///
    /// [`FlowError`] unless the Flow is idle.
    #[tracing::instrument(skip(self), fields(flow_id = %self.state.flow_id(), steps = self.definition().len()))]
    pub fn start(&mut self) -> Result<&FlowExecutionState> {
        self.transition(FlowStatus::Running, JournalAction::Start)?;
        tracing::info!(name = %self.definition().name, "flow started");
        if self.definition().is_empty() {
            self.transition(FlowStatus::Completed, JournalAction::Complete)?;
            self.finish();
        }
        Ok(&self.state)
    }

    /// Record the active step's output and move on
    ///
    /// # Errors
    ///
    /// [`FlowError::Terminal`] after completion or abort,
    /// [`FlowError::NotRunning`] while idle or paused.
    pub fn advance(&mut self, output: PractaOutput) -> Result<&FlowExecutionState> {
        self.step(output, false)
    }

    /// Skip the active step and continue with the next
    ///
    /// The skipped step contributes an empty output, so the next step sees
    /// no previous content.
    ///
    /// # Errors
    ///
    /// Same as [`advance`](Self::advance).
    pub fn skip_current(&mut self) -> Result<&FlowExecutionState> {
        self.step(PractaOutput::empty(), true)
    }

    /// Stop the whole Flow, keeping collected outputs
    ///
    /// # Errors
    ///
    /// [`FlowError::Terminal`] if already ended,
    /// [`FlowError::IllegalTransition`] if never started.
    pub fn abort_flow(&mut self) -> Result<&FlowExecutionState> {
        self.transition(FlowStatus::Aborted, JournalAction::Abort)?;
        tracing::info!(
            flow_id = %self.state.flow_id(),
            index = self.state.current_index(),
            collected = self.state.practa_outputs().len(),
            "flow aborted"
        );
        self.emit(FlowEvent::Aborted {
            flow_id: self.state.flow_id().clone(),
            outputs: self.state.practa_outputs().to_vec(),
        });
        Ok(&self.state)
    }

    /// Suspend advancement
    ///
    /// # Errors
    ///
    /// [`FlowError`] unless running.
    pub fn pause(&mut self) -> Result<&FlowExecutionState> {
        self.transition(FlowStatus::Paused, JournalAction::Pause)?;
        Ok(&self.state)
    }

    /// Continue after [`pause`](Self::pause)
    ///
    /// # Errors
    ///
    /// [`FlowError`] unless paused.
    pub fn resume(&mut self) -> Result<&FlowExecutionState> {
        if self.state.status() != FlowStatus::Paused {
            return Err(match validate_transition(self.state.status(), FlowStatus::Running) {
                Err(terminal @ FlowError::Terminal { .. }) => terminal,
                _ => FlowError::IllegalTransition {
                    from: self.state.status(),
                    to: FlowStatus::Running,
                },
            });
        }
        self.transition(FlowStatus::Running, JournalAction::Resume)?;
        Ok(&self.state)
    }

    /// Context for the active step
    ///
    /// `None` unless running or paused with a step remaining.
    #[must_use]
    pub fn current_context(&self) -> Option<PractaContext> {
        if !matches!(self.state.status(), FlowStatus::Running | FlowStatus::Paused) {
            return None;
        }
        let index = self.state.current_index();
        let step = self.definition().step(index)?;

        let previous = index.checked_sub(1).and_then(|prev| {
            let def = self.definition().step(prev)?;
            let output = self.state.practa_outputs().get(prev)?;
            Some(PreviousPracta {
                practa_id: def.id.clone(),
                practa_type: def.practa_type.clone(),
                content: output.content.clone(),
                metadata: output.metadata.clone(),
            })
        });

        let context = PractaContext::new(self.state.flow_id().clone(), index, previous);
        Some(match &self.storage {
            Some(manager) => context.with_storage(manager.scoped(step.storage_slug())),
            None => context,
        })
    }

    /// Definition of the active step
    #[must_use]
    pub fn current_step(&self) -> Option<&PractaDefinition> {
        if self.state.status().is_terminal() {
            return None;
        }
        self.definition().step(self.state.current_index())
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &FlowExecutionState {
        &self.state
    }

    /// Definition being run
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &FlowDefinition {
        self.state.flow_definition()
    }

    /// Receive future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    /// Transition journal
    #[inline]
    #[must_use]
    pub fn journal(&self) -> &FlowJournal {
        &self.journal
    }

    fn step(&mut self, output: PractaOutput, skipped: bool) -> Result<&FlowExecutionState> {
        match self.state.status() {
            FlowStatus::Running => {}
            status if status.is_terminal() => return Err(FlowError::Terminal { status }),
            status => return Err(FlowError::NotRunning { status }),
        }

        let index = self.state.current_index();
        self.state.push_output(output, skipped);
        let action = if skipped {
            JournalAction::Skip
        } else {
            JournalAction::Advance
        };
        tracing::debug!(
            flow_id = %self.state.flow_id(),
            index,
            practa_type = self.definition().step(index).map_or("", |s| s.practa_type.as_str()),
            skipped,
            "step finished"
        );

        if self.state.current_index() >= self.definition().len() {
            self.record(action, FlowStatus::Running, FlowStatus::Running);
            self.transition(FlowStatus::Completed, JournalAction::Complete)?;
            self.finish();
        } else {
            self.transition(FlowStatus::Running, action)?;
        }
        Ok(&self.state)
    }

    fn transition(&mut self, to: FlowStatus, action: JournalAction) -> Result<()> {
        let from = self.state.status();
        validate_transition(from, to)?;
        self.state.set_status(to);
        self.record(action, from, to);
        self.emit(FlowEvent::StateChanged(self.state.clone()));
        Ok(())
    }

    fn record(&mut self, action: JournalAction, from: FlowStatus, to: FlowStatus) {
        let entry = self.journal.append(
            self.state.flow_id(),
            action,
            from,
            to,
            self.state.current_index(),
        );
        tracing::trace!(sequence = entry.sequence, hash = %entry.hash_hex(), "journal entry");
    }

    fn finish(&mut self) {
        tracing::info!(
            flow_id = %self.state.flow_id(),
            steps = self.state.practa_outputs().len(),
            skipped = self.state.skipped_indices().len(),
            "flow completed"
        );
        self.emit(FlowEvent::Completed {
            flow_id: self.state.flow_id().clone(),
            outputs: self.state.practa_outputs().to_vec(),
        });
    }

    fn emit(&self, event: FlowEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
