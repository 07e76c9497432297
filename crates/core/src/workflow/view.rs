//! Read models returned by the engine's queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spendflow_shared::ApprovalStepId;

use crate::directory::Directory;
use crate::expense::Expense;
use crate::store::ExpenseRecord;
use crate::workflow::aggregate::{Aggregate, StatusAggregator};
use crate::workflow::types::{ApprovalStep, ExpenseStatus};

/// An approval step with its approver's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    /// The step.
    #[serde(flatten)]
    pub step: ApprovalStep,
    /// Approver name from the directory; `None` if the user has since left it.
    pub approver_name: Option<String>,
}

/// An expense with its full step set and derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseView {
    /// The expense.
    #[serde(flatten)]
    pub expense: Expense,
    /// Submitter name from the directory.
    pub submitter_name: Option<String>,
    /// Status derived from the steps.
    pub status: ExpenseStatus,
    /// Steps in sequence order.
    pub steps: Vec<StepView>,
    /// Progress counters.
    pub progress: Aggregate,
    /// When the expense reached a terminal status.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ExpenseView {
    /// Builds a view from a record snapshot, resolving names through the directory.
    #[must_use]
    pub fn from_record(record: ExpenseRecord, directory: &dyn Directory) -> Self {
        let progress = StatusAggregator::aggregate(&record.steps);
        let submitter_name = directory.display_name(record.expense.submitter_id);

        let mut steps: Vec<StepView> = record
            .steps
            .into_iter()
            .map(|step| StepView {
                approver_name: directory.display_name(step.approver_id),
                step,
            })
            .collect();
        steps.sort_by_key(|s| s.step.sequence);

        Self {
            expense: record.expense,
            submitter_name,
            status: progress.status,
            steps,
            progress,
            resolved_at: record.resolved_at,
        }
    }

    /// The step with the given id, if present.
    #[must_use]
    pub fn step(&self, step_id: ApprovalStepId) -> Option<&StepView> {
        self.steps.iter().find(|s| s.step.id == step_id)
    }
}

/// One row of an approver's queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// The approver's own waiting step; pass this to `apply_decision`.
    pub step_id: ApprovalStepId,
    /// The expense with its full step set.
    pub expense: ExpenseView,
}
