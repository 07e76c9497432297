//! Property-based tests for the step state machine.

use chrono::Utc;
use proptest::prelude::*;
use spendflow_shared::{ExpenseId, UserId};

use crate::workflow::error::WorkflowError;
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{ApprovalStep, Decision, StepStatus};

/// Strategy for generating random StepStatus values.
fn arb_status() -> impl Strategy<Value = StepStatus> {
    prop_oneof![
        Just(StepStatus::Waiting),
        Just(StepStatus::Approved),
        Just(StepStatus::Rejected),
        Just(StepStatus::Skipped),
    ]
}

/// Strategy for generating decisions.
fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Rejected)]
}

fn step_in(status: StepStatus) -> ApprovalStep {
    let mut step = ApprovalStep::waiting(ExpenseId::new(), UserId::new(), 1);
    step.status = status;
    step
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Only transitions out of Waiting into a terminal status are valid.
    #[test]
    fn prop_valid_transitions_leave_waiting(from in arb_status(), to in arb_status()) {
        let expected = from == StepStatus::Waiting && to.is_terminal();
        prop_assert_eq!(WorkflowService::is_valid_transition(from, to), expected);
    }

    /// A transition either succeeds exactly as `is_valid_transition` predicts
    /// or leaves the step untouched.
    #[test]
    fn prop_transition_agrees_with_table(from in arb_status(), to in arb_status()) {
        let mut step = step_in(from);
        let before = step.clone();
        let result = WorkflowService::transition(&mut step, to, Utc::now());

        if WorkflowService::is_valid_transition(from, to) {
            prop_assert!(result.is_ok());
            prop_assert_eq!(step.status, to);
            prop_assert!(step.decided_at.is_some());
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(step, before);
        }
    }

    /// Terminal steps reject every decision with ImmutableTerminalState.
    #[test]
    fn prop_terminal_steps_never_change(
        from in arb_status().prop_filter("terminal", StepStatus::is_terminal),
        decision in arb_decision(),
        comments in proptest::option::of("[a-z ]{0,40}")
    ) {
        let mut step = step_in(from);
        let before = step.clone();
        let result = WorkflowService::decide(&mut step, decision, comments, Utc::now());
        let is_immutable = matches!(result, Err(WorkflowError::ImmutableTerminalState { .. }));
        prop_assert!(is_immutable);
        prop_assert_eq!(step, before);
    }

    /// Deciding a waiting step lands on the decision's status.
    #[test]
    fn prop_decide_waiting_step(decision in arb_decision(), comments in "[a-zA-Z0-9]{1,40}") {
        let mut step = step_in(StepStatus::Waiting);
        WorkflowService::decide(&mut step, decision, Some(comments.clone()), Utc::now()).unwrap();
        prop_assert_eq!(step.status, decision.step_status());
        prop_assert_eq!(step.comments, Some(comments));
    }
}
