//! Shared types, errors, and configuration for Spendflow.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ApprovalConfig, FxConfig, LoggingConfig, SeedConfig, ServerConfig};
pub use error::{AppError, AppResult};
pub use types::{ApprovalStepId, CompanyId, Currency, ExpenseId, Money, UserId};
