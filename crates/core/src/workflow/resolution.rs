//! Approver resolution: who must approve a newly submitted expense.
//!
//! Runs once at submission. The resolved approvers are parallel peers; the
//! sequence number on each step is display order, not a gate.

use rust_decimal::Decimal;
use std::collections::HashSet;

use spendflow_shared::{ApprovalConfig, ExpenseId, UserId};

use crate::directory::{Directory, DirectoryUser};
use crate::expense::ExpenseCategory;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::ApprovalStep;

/// Policy controlling which directory users approve an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPolicy {
    /// Levels of the submitter's manager chain that must approve.
    pub manager_chain_depth: usize,
    /// Amounts strictly above this pull in the company's designated approvers.
    /// Compared in the expense's own currency.
    pub escalation_threshold: Option<Decimal>,
    /// Whether designated company approvers participate at all.
    pub include_company_admins: bool,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        Self::from(&ApprovalConfig::default())
    }
}

impl From<&ApprovalConfig> for ApprovalPolicy {
    fn from(config: &ApprovalConfig) -> Self {
        Self {
            manager_chain_depth: config.manager_chain_depth,
            escalation_threshold: config.escalation_threshold,
            include_company_admins: config.include_company_admins,
        }
    }
}

/// What resolution needs to know about the expense being submitted.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRequest<'a> {
    /// The submitting user.
    pub submitter: &'a DirectoryUser,
    /// Expense amount.
    pub amount: Decimal,
    /// Expense category; not used by the current policy.
    pub category: ExpenseCategory,
}

/// Resolves the approver set for an expense.
#[derive(Debug, Clone, Default)]
pub struct ApproverResolver {
    policy: ApprovalPolicy,
}

impl ApproverResolver {
    /// Creates a resolver with the given policy.
    #[must_use]
    pub const fn new(policy: ApprovalPolicy) -> Self {
        Self { policy }
    }

    /// The active policy.
    #[must_use]
    pub const fn policy(&self) -> &ApprovalPolicy {
        &self.policy
    }

    /// Returns true if the amount pulls in the company's designated approvers.
    #[must_use]
    pub fn requires_escalation(&self, amount: Decimal) -> bool {
        self.policy.include_company_admins
            && self
                .policy
                .escalation_threshold
                .is_some_and(|threshold| amount > threshold)
    }

    /// Resolve the ordered approver list.
    ///
    /// Manager chain first (direct manager leading), then designated approvers
    /// when the amount escalates. Duplicates keep their first position and the
    /// submitter is never their own approver.
    ///
    /// # Errors
    /// * `WorkflowError::Configuration` if nobody is left to approve
    pub fn resolve(
        &self,
        directory: &dyn Directory,
        request: &ResolutionRequest<'_>,
    ) -> Result<Vec<UserId>, WorkflowError> {
        let submitter_id = request.submitter.id;

        let managers = directory
            .manager_chain(submitter_id)
            .into_iter()
            .take(self.policy.manager_chain_depth);

        let designated = if self.requires_escalation(request.amount) {
            directory.designated_approvers(request.submitter.company_id)
        } else {
            Vec::new()
        };

        let mut seen = HashSet::from([submitter_id]);
        let approvers: Vec<UserId> = managers
            .chain(designated)
            .filter(|id| seen.insert(*id))
            .collect();

        if approvers.is_empty() {
            return Err(WorkflowError::Configuration { submitter_id });
        }

        Ok(approvers)
    }

    /// Materialize one waiting step per approver, sequence 1..=N.
    #[must_use]
    pub fn build_steps(expense_id: ExpenseId, approvers: &[UserId]) -> Vec<ApprovalStep> {
        approvers
            .iter()
            .zip(1u32..)
            .map(|(approver_id, sequence)| ApprovalStep::waiting(expense_id, *approver_id, sequence))
            .collect()
    }
}
