//! Demo data for local development.
//!
//! One company with an admin, a manager and two employees reporting to the
//! manager, plus a few expenses in different states.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use spendflow_core::directory::{DirectoryUser, InMemoryDirectory, Role};
use spendflow_core::expense::{ExpenseCategory, NewExpense};
use spendflow_core::store::ExpenseStore;
use spendflow_core::workflow::{ApprovalEngine, Decision, WorkflowError};
use spendflow_shared::{CompanyId, Currency, UserId};

/// Ids of the seeded users.
#[derive(Debug, Clone, Copy)]
pub struct DemoUsers {
    pub admin: UserId,
    pub manager: UserId,
    pub employee: UserId,
    pub developer: UserId,
}

/// Adds the demo company's users to the directory.
pub fn seed_directory(directory: &InMemoryDirectory) -> DemoUsers {
    let company = CompanyId::new();
    let user = |name: &str, email: &str, role: Role, manager_id: Option<UserId>| DirectoryUser {
        id: UserId::new(),
        company_id: company,
        name: name.to_string(),
        email: email.to_string(),
        role,
        manager_id,
    };

    let admin = user("Alice Admin", "admin@techcorp.com", Role::Admin, None);
    let manager = user("Bob Manager", "manager@techcorp.com", Role::Manager, None);
    let employee = user(
        "Charlie Employee",
        "employee@techcorp.com",
        Role::Employee,
        Some(manager.id),
    );
    let developer = user(
        "Diana Developer",
        "diana@techcorp.com",
        Role::Employee,
        Some(manager.id),
    );

    let users = DemoUsers {
        admin: admin.id,
        manager: manager.id,
        employee: employee.id,
        developer: developer.id,
    };
    for u in [admin, manager, employee, developer] {
        directory.upsert(u);
    }
    users
}

fn expense(
    submitter_id: UserId,
    title: &str,
    description: &str,
    amount: Decimal,
    currency: Currency,
    category: ExpenseCategory,
    day: u32,
) -> NewExpense {
    NewExpense {
        submitter_id,
        title: title.to_string(),
        description: description.to_string(),
        amount,
        currency,
        category,
        incurred_on: NaiveDate::from_ymd_opt(2026, 10, day).unwrap_or_default(),
    }
}

/// Submits the demo expenses; the office supplies one is approved straight away.
///
/// # Errors
/// Returns the first workflow error; earlier expenses stay submitted.
pub fn seed_expenses<S: ExpenseStore>(
    engine: &ApprovalEngine<S>,
    users: &DemoUsers,
) -> Result<usize, WorkflowError> {
    engine.submit_expense(expense(
        users.employee,
        "Client Lunch Meeting",
        "Lunch with potential client to discuss the Q4 project",
        Decimal::new(8550, 2),
        Currency::Usd,
        ExpenseCategory::Meals,
        2,
    ))?;

    engine.submit_expense(expense(
        users.developer,
        "Conference Travel",
        "Flight and hotel for the Berlin developer conference",
        Decimal::new(45000, 2),
        Currency::Eur,
        ExpenseCategory::Travel,
        5,
    ))?;

    let supplies = engine.submit_expense(expense(
        users.employee,
        "Office Supplies",
        "Notebooks, pens and a monitor stand",
        Decimal::new(12000, 2),
        Currency::Usd,
        ExpenseCategory::OfficeSupplies,
        7,
    ))?;
    for step in &supplies.steps {
        engine.apply_decision(
            step.step.id,
            Decision::Approved,
            Some("Approved - standard supplies".to_string()),
        )?;
    }

    Ok(3)
}
