//! Expense model and submission rules.

pub mod types;
pub mod validation;

pub use types::{Expense, ExpenseCategory, NewExpense};
pub use validation::{ExpenseValidationError, validate_new_expense};
