//! Mutable execution state of one Flow run

use crate::status::FlowStatus;
use chrono::{DateTime, Utc};
use practa_core::{FlowDefinition, FlowId, PractaOutput};
use serde::{Deserialize, Serialize};

/// Snapshot of a Flow run
///
/// While not terminal, `practa_outputs().len() == current_index()`.
/// Only the engine mutates it; hosts get clones or shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowExecutionState {
    flow_id: FlowId,
    flow_definition: FlowDefinition,
    status: FlowStatus,
    current_index: usize,
    practa_outputs: Vec<PractaOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skipped_indices: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aborted_at: Option<DateTime<Utc>>,
}

impl FlowExecutionState {
    pub(crate) fn new(flow_definition: FlowDefinition) -> Self {
        Self {
            flow_id: flow_definition.id.clone(),
            flow_definition,
            status: FlowStatus::Idle,
            current_index: 0,
            practa_outputs: Vec::new(),
            skipped_indices: Vec::new(),
            started_at: None,
            completed_at: None,
            aborted_at: None,
        }
    }

    /// Flow run id
    #[inline]
    #[must_use]
    pub fn flow_id(&self) -> &FlowId {
        &self.flow_id
    }

    /// Definition being run
    #[inline]
    #[must_use]
    pub fn flow_definition(&self) -> &FlowDefinition {
        &self.flow_definition
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> FlowStatus {
        self.status
    }

    /// Index of the active step
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Outputs collected so far, in step order
    #[inline]
    #[must_use]
    pub fn practa_outputs(&self) -> &[PractaOutput] {
        &self.practa_outputs
    }

    /// Steps that were skipped; their outputs are empty
    #[inline]
    #[must_use]
    pub fn skipped_indices(&self) -> &[usize] {
        &self.skipped_indices
    }

    /// When the Flow started
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the last step finished
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// When the Flow was aborted
    #[inline]
    #[must_use]
    pub fn aborted_at(&self) -> Option<DateTime<Utc>> {
        self.aborted_at
    }

    /// Total rice reported by collected outputs
    #[must_use]
    pub fn rice_earned(&self) -> u32 {
        self.practa_outputs
            .iter()
            .map(PractaOutput::rice_earned)
            .fold(0, u32::saturating_add)
    }

    pub(crate) fn set_status(&mut self, status: FlowStatus) {
        self.status = status;
        match status {
            FlowStatus::Running if self.started_at.is_none() => {
                self.started_at = Some(Utc::now());
                self.current_index = 0;
            }
            FlowStatus::Completed => self.completed_at = Some(Utc::now()),
            FlowStatus::Aborted => self.aborted_at = Some(Utc::now()),
            _ => {}
        }
    }

    pub(crate) fn push_output(&mut self, output: PractaOutput, skipped: bool) {
        if skipped {
            self.skipped_indices.push(self.current_index);
        }
        self.practa_outputs.push(output);
        self.current_index += 1;
    }
}
