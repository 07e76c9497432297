//! Expense domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use spendflow_shared::{Currency, ExpenseId, Money, UserId};

/// Expense category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Meals and entertainment.
    Meals,
    /// Flights, hotels, ground transport.
    Travel,
    /// Office supplies and equipment.
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
    /// Software licences and subscriptions.
    Software,
    /// Anything else.
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Returns the display name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meals => "Meals",
            Self::Travel => "Travel",
            Self::OfficeSupplies => "Office Supplies",
            Self::Software => "Software",
            Self::Other => "Other",
        }
    }

    /// Parses a category, ignoring case, spaces and underscores.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "meals" => Some(Self::Meals),
            "travel" => Some(Self::Travel),
            "officesupplies" => Some(Self::OfficeSupplies),
            "software" => Some(Self::Software),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for submitting a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// The employee submitting the expense.
    pub submitter_id: UserId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Amount in major units; must not be negative.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Category.
    pub category: ExpenseCategory,
    /// Date the expense was incurred.
    pub incurred_on: NaiveDate,
}

/// A submitted expense.
///
/// Fields are fixed at submission; only the workflow status, held next to the
/// expense in the store, changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense identifier.
    pub id: ExpenseId,
    /// The submitting user.
    pub submitter_id: UserId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Amount in major units.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: Currency,
    /// Category.
    pub category: ExpenseCategory,
    /// Date the expense was incurred.
    pub incurred_on: NaiveDate,
    /// When the expense was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl Expense {
    /// Builds an expense from validated input.
    #[must_use]
    pub fn from_new(input: NewExpense, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id: ExpenseId::new(),
            submitter_id: input.submitter_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            amount: input.amount,
            currency: input.currency,
            category: input.category,
            incurred_on: input.incurred_on,
            submitted_at,
        }
    }

    /// Returns the amount as `Money`.
    #[must_use]
    pub const fn money(&self) -> Money {
        Money::new(self.amount, self.currency)
    }
}
