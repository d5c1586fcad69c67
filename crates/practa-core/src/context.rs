//! Read-only input handed to a running unit

use crate::content::{PractaContent, PractaMetadata};
use crate::definition::FlowId;
use practa_storage::PractaStorage;
use serde::{Deserialize, Serialize};

/// Output of the step immediately before, as seen by the next step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousPracta {
    /// Id of the previous step
    pub practa_id: String,
    /// Type of the previous step
    pub practa_type: String,
    /// Its content, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PractaContent>,
    /// Its metadata, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PractaMetadata>,
}

/// Input to one unit invocation
///
/// Storage is a live handle and is not part of the serialized form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PractaContext {
    flow_id: FlowId,
    practa_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    previous: Option<PreviousPracta>,
    #[serde(skip)]
    storage: Option<PractaStorage>,
}

impl PractaContext {
    /// Create context without storage
    #[inline]
    #[must_use]
    pub fn new(flow_id: FlowId, practa_index: usize, previous: Option<PreviousPracta>) -> Self {
        Self {
            flow_id,
            practa_index,
            previous,
            storage: None,
        }
    }

    /// With storage handle
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, storage: PractaStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Flow this invocation belongs to
    #[inline]
    #[must_use]
    pub fn flow_id(&self) -> &FlowId {
        &self.flow_id
    }

    /// Zero-based position in the Flow
    #[inline]
    #[must_use]
    pub fn practa_index(&self) -> usize {
        self.practa_index
    }

    /// Previous step's output; `None` at index 0
    #[inline]
    #[must_use]
    pub fn previous(&self) -> Option<&PreviousPracta> {
        self.previous.as_ref()
    }

    /// Storage scoped to this unit
    #[inline]
    #[must_use]
    pub fn storage(&self) -> Option<&PractaStorage> {
        self.storage.as_ref()
    }
}
