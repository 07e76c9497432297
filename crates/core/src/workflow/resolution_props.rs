//! Property-based tests for approver resolution.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

use spendflow_shared::{CompanyId, UserId};

use crate::directory::{Directory, DirectoryUser, InMemoryDirectory, Role};
use crate::expense::ExpenseCategory;
use crate::workflow::error::WorkflowError;
use crate::workflow::resolution::{ApprovalPolicy, ApproverResolver, ResolutionRequest};

/// Strategy for generating random non-negative amounts.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..2_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_policy() -> impl Strategy<Value = ApprovalPolicy> {
    (
        0usize..5,
        proptest::option::of((0i64..200_000i64).prop_map(|n| Decimal::new(n, 2))),
        any::<bool>(),
    )
        .prop_map(
            |(manager_chain_depth, escalation_threshold, include_company_admins)| ApprovalPolicy {
                manager_chain_depth,
                escalation_threshold,
                include_company_admins,
            },
        )
}

/// A reporting line of `chain_len` managers above a submitter, plus `admins`
/// company admins. When `submitter_is_admin` the submitter is one of them.
fn org(
    chain_len: usize,
    admins: usize,
    submitter_is_admin: bool,
) -> (InMemoryDirectory, DirectoryUser) {
    let company = CompanyId::new();
    let directory = InMemoryDirectory::new();

    let mut above = None;
    for level in 0..chain_len {
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
    for n in 0..admins {
        directory.upsert(DirectoryUser {
            id: UserId::new(),
            company_id: company,
            name: format!("Admin {n}"),
            email: format!("a{n}@techcorp.test"),
            role: Role::Admin,
            manager_id: None,
        });
    }

    let submitter = DirectoryUser {
        id: UserId::new(),
        company_id: company,
        name: "Submitter".to_string(),
        email: "submitter@techcorp.test".to_string(),
        role: if submitter_is_admin {
            Role::Admin
        } else {
            Role::Employee
        },
        manager_id: above,
    };
    directory.upsert(submitter.clone());
    (directory, submitter)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Resolved approvers are unique, never the submitter, and led by the
    /// manager chain in reporting order.
    #[test]
    fn prop_resolved_approvers_are_well_formed(
        chain_len in 0usize..5,
        admins in 0usize..3,
        submitter_is_admin in any::<bool>(),
        policy in arb_policy(),
        amount in arb_amount()
    ) {
        let (directory, submitter) = org(chain_len, admins, submitter_is_admin);
        let resolver = ApproverResolver::new(policy.clone());
        let request = ResolutionRequest {
            submitter: &submitter,
            amount,
            category: ExpenseCategory::Other,
        };

        let expected_managers: Vec<UserId> = directory
            .manager_chain(submitter.id)
            .into_iter()
            .take(policy.manager_chain_depth)
            .collect();

        match resolver.resolve(&directory, &request) {
            Ok(approvers) => {
                prop_assert!(!approvers.is_empty());
                prop_assert!(!approvers.contains(&submitter.id));
                let unique: HashSet<UserId> = approvers.iter().copied().collect();
                prop_assert_eq!(unique.len(), approvers.len());
                prop_assert_eq!(&approvers[..expected_managers.len()], &expected_managers[..]);
                if !resolver.requires_escalation(amount) {
                    prop_assert_eq!(approvers, expected_managers);
                }
            }
            Err(WorkflowError::Configuration { submitter_id }) => {
                prop_assert_eq!(submitter_id, submitter.id);
                prop_assert!(expected_managers.is_empty());
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// Escalation pulls in every admin other than the submitter.
    #[test]
    fn prop_escalation_includes_admins(
        chain_len in 0usize..3,
        admins in 1usize..4,
        amount in arb_amount()
    ) {
        let (directory, submitter) = org(chain_len, admins, false);
        let policy = ApprovalPolicy {
            manager_chain_depth: 1,
            escalation_threshold: Some(Decimal::ZERO),
            include_company_admins: true,
        };
        let resolver = ApproverResolver::new(policy);
        let request = ResolutionRequest {
            submitter: &submitter,
            amount,
            category: ExpenseCategory::Other,
        };

        let approvers = resolver.resolve(&directory, &request);
        if amount > Decimal::ZERO {
            let approvers = approvers.unwrap();
            let designated = directory.designated_approvers(submitter.company_id);
            prop_assert_eq!(designated.len(), admins);
            for admin in designated {
                prop_assert!(approvers.contains(&admin));
            }
            prop_assert_eq!(approvers.len(), chain_len.min(1) + admins);
        } else if chain_len == 0 {
            let is_config_error = matches!(approvers, Err(WorkflowError::Configuration { .. }));
            prop_assert!(is_config_error);
        }
    }
}
