//! Expense approval workflow.
//!
//! This module implements the approval step state machine, approver
//! resolution, status aggregation and the engine that ties them to a store.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (StepStatus, ExpenseStatus, Decision, ApprovalStep)
//! - `error` - Workflow-specific error types
//! - `service` - Step transition logic
//! - `resolution` - Approver resolution policy
//! - `aggregate` - Expense status derived from steps
//! - `engine` - Submission, decisions and queries
//! - `view` - Read models

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod resolution;
pub mod service;
pub mod types;
pub mod view;

#[cfg(test)]
mod engine_props;
#[cfg(test)]
mod resolution_props;
#[cfg(test)]
mod service_props;

pub use aggregate::{Aggregate, StatusAggregator};
pub use engine::ApprovalEngine;
pub use error::WorkflowError;
pub use resolution::{ApprovalPolicy, ApproverResolver, ResolutionRequest};
pub use service::WorkflowService;
pub use types::{ApprovalStep, Decision, ExpenseStatus, StepStatus};
pub use view::{ExpenseView, QueueItem, StepView};
