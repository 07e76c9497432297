//! Approval workflow engine.
//!
//! Owns the expense lifecycle: submission with approver resolution, decisions
//! with the rejection cascade, and the read queries. Every decision is applied
//! inside a single `ExpenseStore::update`, so the decided step, any skipped
//! peers and the expense status commit together or not at all.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use spendflow_shared::{ApprovalStepId, ExpenseId, UserId};

use crate::directory::Directory;
use crate::expense::{Expense, NewExpense, validate_new_expense};
use crate::store::{ExpenseRecord, ExpenseStore};
use crate::workflow::aggregate::StatusAggregator;
use crate::workflow::error::WorkflowError;
use crate::workflow::resolution::{ApproverResolver, ResolutionRequest};
use crate::workflow::service::WorkflowService;
use crate::workflow::types::{Decision, ExpenseStatus};
use crate::workflow::view::{ExpenseView, QueueItem};

/// What a committed decision changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Applied {
    skipped: usize,
    resolved: Option<ExpenseStatus>,
}

/// Expense approval engine over a store and a directory.
pub struct ApprovalEngine<S> {
    store: S,
    directory: Arc<dyn Directory>,
    resolver: ApproverResolver,
}

impl<S: ExpenseStore> ApprovalEngine<S> {
    /// Creates an engine.
    pub fn new(store: S, directory: Arc<dyn Directory>, resolver: ApproverResolver) -> Self {
        Self {
            store,
            directory,
            resolver,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The directory used for resolution and display names.
    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    /// Submit a new expense.
    ///
    /// Resolves the approvers and persists the expense with one Waiting step
    /// per approver. Resolution happens exactly once; every call creates a new
    /// expense.
    ///
    /// # Errors
    /// * `WorkflowError::Validation` if the input breaks a business rule
    /// * `WorkflowError::UserNotFound` if the submitter is not in the directory
    /// * `WorkflowError::Configuration` if no approver can be resolved
    /// * `WorkflowError::TransientStore` if the insert fails
    pub fn submit_expense(&self, input: NewExpense) -> Result<ExpenseView, WorkflowError> {
        validate_new_expense(&input)?;

        let submitter = self
            .directory
            .get_user(input.submitter_id)
            .ok_or(WorkflowError::UserNotFound(input.submitter_id))?;

        let request = ResolutionRequest {
            submitter: &submitter,
            amount: input.amount,
            category: input.category,
        };
        let approvers = match self.resolver.resolve(self.directory.as_ref(), &request) {
            Ok(approvers) => approvers,
            Err(err) => {
                warn!(submitter_id = %submitter.id, error = %err, "Expense submission rejected");
                return Err(err);
            }
        };

        let expense = Expense::from_new(input, Utc::now());
        let steps = ApproverResolver::build_steps(expense.id, &approvers);
        let record = ExpenseRecord::pending(expense, steps);
        self.store.insert(record.clone())?;

        info!(
            expense_id = %record.expense.id,
            submitter_id = %record.expense.submitter_id,
            amount = %record.expense.money(),
            approvers = approvers.len(),
            "Expense submitted"
        );

        Ok(self.view(record))
    }

    /// Apply an approver's decision to a step.
    ///
    /// A rejection skips every other waiting step. The expense becomes
    /// Rejected on any rejection, Approved once no step is left waiting.
    ///
    /// # Errors
    /// * `WorkflowError::StepNotFound` if the step does not exist
    /// * `WorkflowError::StaleDecision` if the step already left Waiting
    /// * `WorkflowError::TransientStore` if the commit fails; nothing was applied
    pub fn apply_decision(
        &self,
        step_id: ApprovalStepId,
        decision: Decision,
        comments: Option<String>,
    ) -> Result<ExpenseView, WorkflowError> {
        let expense_id = self
            .store
            .expense_for_step(step_id)?
            .ok_or(WorkflowError::StepNotFound(step_id))?;

        let result = self.store.update(expense_id, |record| {
            Self::decide_in(record, step_id, decision, comments, Utc::now())
                .map(|applied| (applied, record.clone()))
        });

        let (applied, record) = match result {
            Ok(out) => out,
            Err(err @ WorkflowError::StaleDecision { .. }) => {
                info!(%step_id, %expense_id, error = %err, "Stale decision ignored");
                return Err(err);
            }
            Err(err) => {
                warn!(%step_id, %expense_id, error = %err, "Decision not applied");
                return Err(err);
            }
        };

        info!(%step_id, %expense_id, %decision, "Decision applied");
        if applied.skipped > 0 {
            debug!(%expense_id, skipped = applied.skipped, "Waiting peers skipped after rejection");
        }
        if let Some(status) = applied.resolved {
            info!(%expense_id, %status, "Expense reached terminal status");
        }

        Ok(self.view(record))
    }

    /// Mutates one record for a decision. Runs under the store's per-expense lock.
    fn decide_in(
        record: &mut ExpenseRecord,
        step_id: ApprovalStepId,
        decision: Decision,
        comments: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Applied, WorkflowError> {
        let step = record
            .steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or(WorkflowError::StepNotFound(step_id))?;

        if !step.is_waiting() {
            return Err(WorkflowError::StaleDecision {
                step_id,
                status: step.status,
            });
        }
        WorkflowService::decide(step, decision, comments, at)?;

        let mut skipped = 0;
        if decision == Decision::Rejected {
            for peer in record.steps.iter_mut().filter(|s| s.is_waiting()) {
                WorkflowService::skip(peer, at)?;
                skipped += 1;
            }
        }

        let resolved = if decision == Decision::Rejected {
            Some(ExpenseStatus::Rejected)
        } else if record.has_waiting_steps() {
            None
        } else {
            Some(ExpenseStatus::Approved)
        };

        if let Some(status) = resolved {
            record.status = status;
            record.resolved_at = Some(at);
        }
        debug_assert_eq!(record.status, StatusAggregator::status(&record.steps));

        Ok(Applied { skipped, resolved })
    }

    /// Fetch one expense.
    ///
    /// # Errors
    /// * `WorkflowError::ExpenseNotFound` if it does not exist
    /// * `WorkflowError::TransientStore` if the store cannot be read
    pub fn get_expense(&self, id: ExpenseId) -> Result<ExpenseView, WorkflowError> {
        let record = self
            .store
            .get(id)?
            .ok_or(WorkflowError::ExpenseNotFound(id))?;
        Ok(self.view(record))
    }

    /// Expenses awaiting the approver's decision, oldest submission first.
    ///
    /// One row per expense, carrying the approver's waiting step.
    ///
    /// # Errors
    /// * `WorkflowError::UserNotFound` if the approver is not in the directory
    /// * `WorkflowError::TransientStore` if the store cannot be read
    pub fn list_queue(&self, approver_id: UserId) -> Result<Vec<QueueItem>, WorkflowError> {
        self.require_user(approver_id)?;

        let mut records = self.store.scan(&|record| {
            record
                .steps
                .iter()
                .any(|s| s.approver_id == approver_id && s.is_waiting())
        })?;
        records.sort_by_key(|r| (r.expense.submitted_at, r.expense.id));

        Ok(records
            .into_iter()
            .filter_map(|record| {
                let step_id = record
                    .steps
                    .iter()
                    .filter(|s| s.approver_id == approver_id && s.is_waiting())
                    .min_by_key(|s| s.sequence)
                    .map(|s| s.id)?;
                Some(QueueItem {
                    step_id,
                    expense: self.view(record),
                })
            })
            .collect())
    }

    /// A submitter's expenses, newest first.
    ///
    /// # Errors
    /// * `WorkflowError::UserNotFound` if the submitter is not in the directory
    /// * `WorkflowError::TransientStore` if the store cannot be read
    pub fn get_history(&self, submitter_id: UserId) -> Result<Vec<ExpenseView>, WorkflowError> {
        self.require_user(submitter_id)?;

        let mut records = self
            .store
            .scan(&|record| record.expense.submitter_id == submitter_id)?;
        records.sort_by_key(|r| std::cmp::Reverse((r.expense.submitted_at, r.expense.id)));

        Ok(records.into_iter().map(|r| self.view(r)).collect())
    }

    /// Every expense, newest first, optionally filtered by derived status.
    ///
    /// # Errors
    /// * `WorkflowError::TransientStore` if the store cannot be read
    pub fn list_all(&self, status: Option<ExpenseStatus>) -> Result<Vec<ExpenseView>, WorkflowError> {
        let mut records = self.store.scan(&|record| {
            status.is_none_or(|wanted| StatusAggregator::status(&record.steps) == wanted)
        })?;
        records.sort_by_key(|r| std::cmp::Reverse((r.expense.submitted_at, r.expense.id)));

        Ok(records.into_iter().map(|r| self.view(r)).collect())
    }

    fn require_user(&self, id: UserId) -> Result<(), WorkflowError> {
        self.directory
            .get_user(id)
            .map(|_| ())
            .ok_or(WorkflowError::UserNotFound(id))
    }

    fn view(&self, record: ExpenseRecord) -> ExpenseView {
        ExpenseView::from_record(record, self.directory.as_ref())
    }
}
