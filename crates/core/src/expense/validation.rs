//! Business rule validation for expense submission.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::NewExpense;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Validation errors for a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseValidationError {
    /// Title is empty after trimming.
    #[error("Expense title is required")]
    TitleRequired,

    /// Title exceeds the maximum length.
    #[error("Expense title exceeds {max} characters")]
    TitleTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Description exceeds the maximum length.
    #[error("Expense description exceeds {max} characters")]
    DescriptionTooLong {
        /// Maximum allowed length.
        max: usize,
    },

    /// Amount is negative.
    #[error("Expense amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// Amount has more decimal places than the currency allows.
    #[error("Amount {amount} has more than {max_scale} decimal places")]
    TooPrecise {
        /// The submitted amount.
        amount: Decimal,
        /// Decimal places allowed by the currency.
        max_scale: u32,
    },
}

/// Validates a new expense before approver resolution runs.
///
/// # Errors
///
/// Returns the first rule the input violates.
pub fn validate_new_expense(input: &NewExpense) -> Result<(), ExpenseValidationError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(ExpenseValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ExpenseValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    if input.description.trim().chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ExpenseValidationError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }

    if input.amount.is_sign_negative() && !input.amount.is_zero() {
        return Err(ExpenseValidationError::NegativeAmount(input.amount));
    }

    let max_scale = input.currency.minor_units();
    if input.amount.normalize().scale() > max_scale {
        return Err(ExpenseValidationError::TooPrecise {
            amount: input.amount,
            max_scale,
        });
    }

    Ok(())
}
