//! Workflow error types for the expense approval lifecycle.
//!
//! Every failure is returned to the caller; nothing is swallowed. The variants
//! map onto the external taxonomy: `Configuration`, `StaleDecision`, the
//! `*NotFound` family and `TransientStore`.

use thiserror::Error;

use spendflow_shared::{ApprovalStepId, ExpenseId, UserId};

use crate::expense::ExpenseValidationError;
use crate::store::StoreError;
use crate::workflow::types::StepStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No approver could be resolved for the submitter. Fatal to the submission.
    #[error("No approvers configured for submitter {submitter_id}")]
    Configuration {
        /// The submitting user.
        submitter_id: UserId,
    },

    /// The step already left Waiting; the decision was not applied.
    #[error("Approval step {step_id} was already decided ({status})")]
    StaleDecision {
        /// The step the decision targeted.
        step_id: ApprovalStepId,
        /// The step's status at the time of the attempt.
        status: StepStatus,
    },

    /// A terminal step was asked to transition again.
    #[error("Approval step {step_id} is {status} and can no longer change")]
    ImmutableTerminalState {
        /// The step.
        step_id: ApprovalStepId,
        /// Its terminal status.
        status: StepStatus,
    },

    /// The requested transition is not part of the step state machine.
    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: StepStatus,
        /// The attempted target status.
        to: StepStatus,
    },

    /// Expense not found.
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    /// Approval step not found.
    #[error("Approval step {0} not found")]
    StepNotFound(ApprovalStepId),

    /// User not found in the directory.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// The submitted expense violates a business rule.
    #[error(transparent)]
    Validation(#[from] ExpenseValidationError),

    /// The store failed during the commit; nothing was applied.
    #[error("Expense store unavailable: {0}")]
    TransientStore(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } | Self::Validation(_) => 400,
            Self::ExpenseNotFound(_) | Self::StepNotFound(_) | Self::UserNotFound(_) => 404,
            Self::StaleDecision { .. } | Self::ImmutableTerminalState { .. } => 409,
            Self::Configuration { .. } => 422,
            Self::TransientStore(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "NO_APPROVERS_CONFIGURED",
            Self::StaleDecision { .. } => "STALE_DECISION",
            Self::ImmutableTerminalState { .. } => "IMMUTABLE_TERMINAL_STATE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::StepNotFound(_) => "STEP_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::TransientStore(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns true if retrying the whole call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ExpenseNotFound(id) => Self::ExpenseNotFound(id),
            StoreError::Unavailable(reason) => Self::TransientStore(reason),
        }
    }
}
