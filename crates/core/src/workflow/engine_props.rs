//! Property-based tests for the approval engine.
//!
//! Random decision sequences against random parallel approver sets; after every
//! call the stored status must match the aggregator and no decided step may
//! ever change again.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;

use spendflow_shared::{ApprovalStepId, CompanyId, Currency, UserId};

use crate::directory::{DirectoryUser, InMemoryDirectory, Role};
use crate::expense::{ExpenseCategory, NewExpense};
use crate::store::{ExpenseStore, InMemoryExpenseStore};
use crate::workflow::aggregate::StatusAggregator;
use crate::workflow::engine::ApprovalEngine;
use crate::workflow::error::WorkflowError;
use crate::workflow::resolution::{ApprovalPolicy, ApproverResolver};
use crate::workflow::types::{Decision, ExpenseStatus, StepStatus};

fn arb_decision() -> impl Strategy<Value = Decision> {
    prop_oneof![Just(Decision::Approved), Just(Decision::Rejected)]
}

/// Engine whose submitter has `approvers` managers above them, all required.
fn engine_with_chain(approvers: usize) -> (ApprovalEngine<InMemoryExpenseStore>, UserId) {
    let company = CompanyId::new();
    let directory = InMemoryDirectory::new();

    let mut above = None;
    for level in 0..approvers {
        let manager = DirectoryUser {
            id: UserId::new(),
            company_id: company,
            name: format!("Manager {level}"),
            email: format!("m{level}@techcorp.test"),
            role: Role::Manager,
            manager_id: above,
        };
        above = Some(manager.id);
        directory.upsert(manager);
    }
    let submitter = DirectoryUser {
        id: UserId::new(),
        company_id: company,
        name: "Submitter".to_string(),
        email: "submitter@techcorp.test".to_string(),
        role: Role::Employee,
        manager_id: above,
    };
    let submitter_id = submitter.id;
    directory.upsert(submitter);

    let resolver = ApproverResolver::new(ApprovalPolicy {
        manager_chain_depth: approvers,
        escalation_threshold: None,
        include_company_admins: false,
    });
    let engine = ApprovalEngine::new(InMemoryExpenseStore::new(), Arc::new(directory), resolver);
    (engine, submitter_id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any interleaving of decisions keeps the stored status consistent with
    /// the steps, never mutates a decided step, and ends terminal once every
    /// step has been decided.
    #[test]
    fn prop_decision_sequences_converge(
        approvers in 1usize..5,
        ops in proptest::collection::vec((0usize..5, arb_decision()), 1..12)
    ) {
        let (engine, submitter_id) = engine_with_chain(approvers);
        let submitted = engine
            .submit_expense(NewExpense {
                submitter_id,
                title: "Team offsite".to_string(),
                description: String::new(),
                amount: dec!(150.00),
                currency: Currency::Eur,
                category: ExpenseCategory::Travel,
                incurred_on: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            })
            .unwrap();
        let expense_id = submitted.expense.id;
        let step_ids: Vec<ApprovalStepId> = submitted.steps.iter().map(|s| s.step.id).collect();
        prop_assert_eq!(step_ids.len(), approvers);

        let mut frozen: HashMap<ApprovalStepId, StepStatus> = HashMap::new();
        let mut terminal: Option<ExpenseStatus> = None;

        for (index, decision) in ops {
            let step_id = step_ids[index % step_ids.len()];
            let result = engine.apply_decision(step_id, decision, None);

            match (&result, frozen.get(&step_id)) {
                (Ok(_), None) => {}
                (Err(WorkflowError::StaleDecision { status, .. }), Some(expected)) => {
                    prop_assert_eq!(status, expected);
                }
                (other, prior) => {
                    prop_assert!(false, "unexpected {:?} for step previously {:?}", other, prior);
                }
            }

            let record = engine.store().get(expense_id).unwrap().unwrap();
            prop_assert_eq!(record.status, StatusAggregator::status(&record.steps));

            for step in &record.steps {
                if let Some(prev) = frozen.get(&step.id) {
                    prop_assert_eq!(step.status, *prev);
                }
                if step.status.is_terminal() {
                    frozen.insert(step.id, step.status);
                }
            }

            if let Some(done) = terminal {
                prop_assert_eq!(record.status, done);
            } else if record.status.is_terminal() {
                prop_assert!(!record.has_waiting_steps());
                prop_assert!(record.resolved_at.is_some());
                terminal = Some(record.status);
            }

            if record.status == ExpenseStatus::Rejected {
                let rejected = record
                    .steps
                    .iter()
                    .filter(|s| s.status == StepStatus::Rejected)
                    .count();
                prop_assert_eq!(rejected, 1);
            }
        }

        if frozen.len() == step_ids.len() {
            prop_assert!(terminal.is_some());
        }
    }
}
