use practa_flow::state_machine::{allowed_transitions, validate_transition};
use practa_flow::{FlowError, FlowStatus};
use proptest::prelude::*;

#[test]
fn test_idle_transitions() {
    assert!(validate_transition(FlowStatus::Idle, FlowStatus::Running).is_ok());

    assert_eq!(
        validate_transition(FlowStatus::Idle, FlowStatus::Aborted),
        Err(FlowError::IllegalTransition {
            from: FlowStatus::Idle,
            to: FlowStatus::Aborted,
        })
    );
    assert!(validate_transition(FlowStatus::Idle, FlowStatus::Paused).is_err());
    assert!(validate_transition(FlowStatus::Idle, FlowStatus::Completed).is_err());
}

#[test]
fn test_running_transitions() {
    // Step transition
    assert!(validate_transition(FlowStatus::Running, FlowStatus::Running).is_ok());
    assert!(validate_transition(FlowStatus::Running, FlowStatus::Paused).is_ok());
    assert!(validate_transition(FlowStatus::Running, FlowStatus::Completed).is_ok());
    assert!(validate_transition(FlowStatus::Running, FlowStatus::Aborted).is_ok());

    assert!(validate_transition(FlowStatus::Running, FlowStatus::Idle).is_err());
}

#[test]
fn test_paused_cannot_complete() {
    assert!(validate_transition(FlowStatus::Paused, FlowStatus::Running).is_ok());
    assert_eq!(
        validate_transition(FlowStatus::Paused, FlowStatus::Completed),
        Err(FlowError::IllegalTransition {
            from: FlowStatus::Paused,
            to: FlowStatus::Completed,
        })
    );
}

#[test]
fn test_terminal_statuses_are_final() {
    for from in [FlowStatus::Completed, FlowStatus::Aborted] {
        assert!(allowed_transitions(from).is_empty());
        for to in FlowStatus::ALL {
            assert_eq!(
                validate_transition(from, to),
                Err(FlowError::Terminal { status: from })
            );
        }
    }
}

fn any_status() -> impl Strategy<Value = FlowStatus> {
    prop::sample::select(FlowStatus::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_status(), to in any_status()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_nothing_returns_to_idle(from in any_status()) {
        prop_assert!(!allowed_transitions(from).contains(&FlowStatus::Idle));
    }
}
