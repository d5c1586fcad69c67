//! Allowed Flow status transitions

use crate::error::FlowError;
use crate::status::FlowStatus;

/// Validates a status transition.
///
/// Leaving a terminal status reports [`FlowError::Terminal`]; any other
/// transition outside the table reports [`FlowError::IllegalTransition`].
///
/// # Errors
///
/// See above.
pub fn validate_transition(from: FlowStatus, to: FlowStatus) -> Result<(), FlowError> {
    if allowed(from, to) {
        Ok(())
    } else if from.is_terminal() {
        Err(FlowError::Terminal { status: from })
    } else {
        Err(FlowError::IllegalTransition { from, to })
    }
}

/// Statuses reachable from `from` in one step
///
/// `running → running` is the step transition.
#[must_use]
pub fn allowed_transitions(from: FlowStatus) -> Vec<FlowStatus> {
    use FlowStatus::{Aborted, Completed, Idle, Paused, Running};
    match from {
        Idle => vec![Running],
        Running => vec![Running, Paused, Completed, Aborted],
        Paused => vec![Running, Aborted],
        Completed | Aborted => vec![],
    }
}

fn allowed(from: FlowStatus, to: FlowStatus) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
