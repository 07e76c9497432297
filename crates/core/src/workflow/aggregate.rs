//! Status aggregation: expense status and progress derived from its steps.
//!
//! Pure functions over a step snapshot. Queue, history and admin views read
//! through here; the engine's own terminal decision must always agree with it.

use serde::{Deserialize, Serialize};

use crate::workflow::types::{ApprovalStep, ExpenseStatus, StepStatus};

/// Derived status plus progress counters for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Derived expense status.
    pub status: ExpenseStatus,
    /// Steps that approved.
    pub approved_count: usize,
    /// Steps that left Waiting (approved, rejected or skipped).
    pub decided_count: usize,
    /// Steps still waiting.
    pub pending_count: usize,
    /// All steps; no step is excluded from the total.
    pub total_steps: usize,
}

/// Stateless aggregator over approval steps.
pub struct StatusAggregator;

impl StatusAggregator {
    /// Aggregate a step set.
    #[must_use]
    pub fn aggregate(steps: &[ApprovalStep]) -> Aggregate {
        let mut approved_count = 0;
        let mut rejected_count = 0;
        let mut pending_count = 0;

        for step in steps {
            match step.status {
                StepStatus::Approved => approved_count += 1,
                StepStatus::Rejected => rejected_count += 1,
                StepStatus::Waiting => pending_count += 1,
                StepStatus::Skipped => {}
            }
        }

        let total_steps = steps.len();
        let status = if rejected_count > 0 {
            ExpenseStatus::Rejected
        } else if total_steps > 0 && approved_count == total_steps {
            ExpenseStatus::Approved
        } else {
            // An empty set never approves by itself.
            ExpenseStatus::Pending
        };

        Aggregate {
            status,
            approved_count,
            decided_count: total_steps - pending_count,
            pending_count,
            total_steps,
        }
    }

    /// Derived expense status only.
    #[must_use]
    pub fn status(steps: &[ApprovalStep]) -> ExpenseStatus {
        Self::aggregate(steps).status
    }
}
