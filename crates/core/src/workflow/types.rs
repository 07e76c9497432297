//! Workflow domain types for the expense approval lifecycle.
//!
//! Statuses are closed enums internally; the capitalized strings
//! (`"Waiting"`, `"Approved"`, ...) only appear at the serialization boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use spendflow_shared::{ApprovalStepId, ExpenseId, UserId};

/// Status of a single approver's decision task.
///
/// Valid transitions:
/// - Waiting → Approved (approver approves)
/// - Waiting → Rejected (approver rejects)
/// - Waiting → Skipped (a peer rejected first)
///
/// Approved, Rejected and Skipped are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// Awaiting the approver's decision.
    Waiting,
    /// The approver approved.
    Approved,
    /// The approver rejected.
    Rejected,
    /// Closed without a decision because a peer rejected.
    Skipped,
}

impl StepStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Skipped => "Skipped",
        }
    }

    /// Parses a status from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "waiting" => Some(Self::Waiting),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Returns true once no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting)
    }

    /// Returns true if the step counts as decided for progress display.
    ///
    /// Identical to [`Self::is_terminal`]: a skipped step is decided, not approved.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        self.is_terminal()
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall status of an expense, always derived from its steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseStatus {
    /// At least one step is still waiting and none has rejected.
    Pending,
    /// Every step approved.
    Approved,
    /// A step rejected.
    Rejected,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parses a status from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true for Approved and Rejected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approver's verdict on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the expense.
    Approved,
    /// Reject the expense, closing the whole review.
    Rejected,
}

impl Decision {
    /// Returns the lowercase wire form (`"approved"` / `"rejected"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a decision, case-insensitively. Accepts `approve`/`reject` too.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "approved" | "approve" => Some(Self::Approved),
            "rejected" | "reject" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// The step status this decision moves a waiting step to.
    #[must_use]
    pub const fn step_status(&self) -> StepStatus {
        match self {
            Self::Approved => StepStatus::Approved,
            Self::Rejected => StepStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One approver's decision task against one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Step identifier.
    pub id: ApprovalStepId,
    /// Expense this step belongs to.
    pub expense_id: ExpenseId,
    /// Directory user who must decide.
    pub approver_id: UserId,
    /// Display position in the approver set, starting at 1.
    pub sequence: u32,
    /// Current status.
    pub status: StepStatus,
    /// Comments left with the decision.
    pub comments: Option<String>,
    /// When the step left Waiting.
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalStep {
    /// Creates a waiting step.
    #[must_use]
    pub fn waiting(expense_id: ExpenseId, approver_id: UserId, sequence: u32) -> Self {
        Self {
            id: ApprovalStepId::new(),
            expense_id,
            approver_id,
            sequence,
            status: StepStatus::Waiting,
            comments: None,
            decided_at: None,
        }
    }

    /// Returns true while the step awaits a decision.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.status == StepStatus::Waiting
    }
}
