//! Hash-chained record of Flow transitions

use crate::error::FlowError;
use crate::status::FlowStatus;
use chrono::{DateTime, Utc};
use practa_core::FlowId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalAction {
    /// Flow started
    Start,
    /// Step completed with output
    Advance,
    /// Step skipped
    Skip,
    /// Host paused
    Pause,
    /// Host resumed
    Resume,
    /// Last step done
    Complete,
    /// Host aborted
    Abort,
}

impl JournalAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Advance => "advance",
            Self::Skip => "skip",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Complete => "complete",
            Self::Abort => "abort",
        }
    }
}

impl fmt::Display for JournalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal
    pub sequence: u64,
    /// Wall-clock time
    pub timestamp: DateTime<Utc>,
    /// Flow run
    pub flow_id: FlowId,
    /// Action taken
    pub action: JournalAction,
    /// Status before
    pub from: FlowStatus,
    /// Status after
    pub to: FlowStatus,
    /// Step index after the action
    pub index: usize,
    /// Hash of the previous entry, zero for the first
    pub prev_hash: [u8; 32],
    /// Hash of this entry
    pub hash: [u8; 32],
}

impl JournalEntry {
    /// Hex form of `hash`
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Append-only transition log of one Flow run
#[derive(Debug, Clone, Default)]
pub struct FlowJournal {
    entries: Vec<JournalEntry>,
}

impl FlowJournal {
    pub(crate) fn append(
        &mut self,
        flow_id: &FlowId,
        action: JournalAction,
        from: FlowStatus,
        to: FlowStatus,
        index: usize,
    ) -> &JournalEntry {
        let prev_hash = self.entries.last().map_or([0u8; 32], |e| e.hash);
        let mut entry = JournalEntry {
            sequence: self.entries.len() as u64,
            timestamp: Utc::now(),
            flow_id: flow_id.clone(),
            action,
            from,
            to,
            index,
            prev_hash,
            hash: [0u8; 32],
        };
        entry.hash = compute_hash(&entry);
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hex hash of the newest entry
    #[must_use]
    pub fn head(&self) -> Option<String> {
        self.entries.last().map(JournalEntry::hash_hex)
    }

    /// Recompute the chain
    ///
    /// # Errors
    ///
    /// [`FlowError::JournalIntegrity`] naming the first entry that fails.
    pub fn verify_integrity(&self) -> Result<(), FlowError> {
        let mut prev = [0u8; 32];
        for entry in &self.entries {
            if entry.prev_hash != prev || entry.hash != compute_hash(entry) {
                return Err(FlowError::JournalIntegrity {
                    sequence: entry.sequence,
                });
            }
            prev = entry.hash;
        }
        Ok(())
    }

    #[cfg(test)]
    fn entries_mut(&mut self) -> &mut Vec<JournalEntry> {
        &mut self.entries
    }
}

fn compute_hash(entry: &JournalEntry) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(entry.sequence.to_le_bytes());
    hasher.update(entry.timestamp.timestamp_micros().to_le_bytes());
    hasher.update(entry.flow_id.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(entry.action.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(entry.from.as_str().as_bytes());
    hasher.update([0]);
    hasher.update(entry.to.as_str().as_bytes());
    hasher.update([0]);
    hasher.update((entry.index as u64).to_le_bytes());
    hasher.update(entry.prev_hash);
    hasher.finalize().into()
}
