//! Store error types.

use thiserror::Error;

use spendflow_shared::ExpenseId;

/// Errors raised by an `ExpenseStore`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record for the expense.
    #[error("Expense {0} not found in store")]
    ExpenseNotFound(ExpenseId),

    /// The backing store could not complete the operation. Nothing was written.
    #[error("{0}")]
    Unavailable(String),
}
