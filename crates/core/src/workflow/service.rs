//! Step state machine.
//!
//! Every change to an `ApprovalStep` goes through `WorkflowService`, which
//! enforces the forward-only transitions out of Waiting.

use chrono::{DateTime, Utc};

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ApprovalStep, Decision, StepStatus};

/// Stateless service for approval step transitions.
pub struct WorkflowService;

impl WorkflowService {
    /// Check if a step status transition is valid.
    ///
    /// Valid transitions:
    /// - Waiting → Approved
    /// - Waiting → Rejected
    /// - Waiting → Skipped
    #[must_use]
    pub fn is_valid_transition(from: StepStatus, to: StepStatus) -> bool {
        matches!(
            (from, to),
            (
                StepStatus::Waiting,
                StepStatus::Approved | StepStatus::Rejected | StepStatus::Skipped
            )
        )
    }

    /// Move a step to `to`, stamping the transition time.
    ///
    /// # Errors
    /// * `WorkflowError::ImmutableTerminalState` if the step is already terminal
    /// * `WorkflowError::InvalidTransition` for any other disallowed target
    pub fn transition(
        step: &mut ApprovalStep,
        to: StepStatus,
        at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        if step.status.is_terminal() {
            return Err(WorkflowError::ImmutableTerminalState {
                step_id: step.id,
                status: step.status,
            });
        }
        if !Self::is_valid_transition(step.status, to) {
            return Err(WorkflowError::InvalidTransition {
                from: step.status,
                to,
            });
        }

        step.status = to;
        step.decided_at = Some(at);
        Ok(())
    }

    /// Record an approver's decision on a waiting step.
    ///
    /// Blank comments are stored as `None`.
    ///
    /// # Errors
    /// * `WorkflowError::ImmutableTerminalState` if the step is already terminal
    pub fn decide(
        step: &mut ApprovalStep,
        decision: Decision,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        Self::transition(step, decision.step_status(), at)?;
        step.comments = comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(())
    }

    /// Close a waiting peer because another approver rejected.
    ///
    /// # Errors
    /// * `WorkflowError::ImmutableTerminalState` if the step is already terminal
    pub fn skip(step: &mut ApprovalStep, at: DateTime<Utc>) -> Result<(), WorkflowError> {
        Self::transition(step, StepStatus::Skipped, at)
    }
}
