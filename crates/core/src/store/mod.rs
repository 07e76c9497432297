//! Expense persistence.
//!
//! An expense and all of its approval steps live in one `ExpenseRecord` and are
//! committed together. `ExpenseStore::update` is the only mutation path after
//! insert: the closure runs under a per-expense exclusive lock against a
//! working copy, and the copy replaces the stored record only if the closure
//! succeeds.

mod error;
mod memory;

pub use error::StoreError;
pub use memory::InMemoryExpenseStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spendflow_shared::{ApprovalStepId, ExpenseId};

use crate::expense::Expense;
use crate::workflow::types::{ApprovalStep, ExpenseStatus};

/// An expense together with its approval steps and terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// The expense as submitted.
    pub expense: Expense,
    /// Approval steps ordered by sequence.
    pub steps: Vec<ApprovalStep>,
    /// Current expense status. Pending until the engine sets a terminal value.
    pub status: ExpenseStatus,
    /// When the status became terminal.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ExpenseRecord {
    /// A freshly submitted, pending record.
    #[must_use]
    pub const fn pending(expense: Expense, steps: Vec<ApprovalStep>) -> Self {
        Self {
            expense,
            steps,
            status: ExpenseStatus::Pending,
            resolved_at: None,
        }
    }

    /// Returns the expense id.
    #[must_use]
    pub const fn id(&self) -> ExpenseId {
        self.expense.id
    }

    /// Finds a step by id.
    #[must_use]
    pub fn step(&self, step_id: ApprovalStepId) -> Option<&ApprovalStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Returns true while any step is waiting.
    #[must_use]
    pub fn has_waiting_steps(&self) -> bool {
        self.steps.iter().any(ApprovalStep::is_waiting)
    }
}

/// Storage seam for expense records.
pub trait ExpenseStore: Send + Sync {
    /// Stores a new record and indexes its steps.
    ///
    /// # Errors
    /// * `StoreError::Unavailable` if the store cannot accept writes
    fn insert(&self, record: ExpenseRecord) -> Result<(), StoreError>;

    /// Loads a snapshot of one record.
    ///
    /// # Errors
    /// * `StoreError::Unavailable` if the store cannot be read
    fn get(&self, id: ExpenseId) -> Result<Option<ExpenseRecord>, StoreError>;

    /// Finds the expense that owns a step.
    ///
    /// # Errors
    /// * `StoreError::Unavailable` if the store cannot be read
    fn expense_for_step(&self, step_id: ApprovalStepId) -> Result<Option<ExpenseId>, StoreError>;

    /// Atomically read-modify-write one record.
    ///
    /// Concurrent updates to the same expense are serialized. If `f` returns
    /// `Err`, or the commit fails, the stored record is unchanged.
    ///
    /// # Errors
    /// * `StoreError::ExpenseNotFound` (converted into `E`) if there is no record
    /// * `StoreError::Unavailable` (converted into `E`) if the commit fails
    /// * whatever `f` returns
    fn update<T, E, F>(&self, id: ExpenseId, f: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut ExpenseRecord) -> Result<T, E>;

    /// Snapshots of every record matching `filter`, in no particular order.
    ///
    /// # Errors
    /// * `StoreError::Unavailable` if the store cannot be read
    fn scan(&self, filter: &dyn Fn(&ExpenseRecord) -> bool)
    -> Result<Vec<ExpenseRecord>, StoreError>;
}
