//! Flow lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a Flow run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    /// Prepared, not started
    #[default]
    Idle,
    /// One unit is active
    Running,
    /// Suspended by the host
    Paused,
    /// Every step finished
    Completed,
    /// Stopped early
    Aborted,
}

impl FlowStatus {
    /// All statuses
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Running,
        Self::Paused,
        Self::Completed,
        Self::Aborted,
    ];

    /// Check if no further transition is possible
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
