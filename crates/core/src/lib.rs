//! Core business logic for Spendflow.
//!
//! Domain types, validation, approver resolution and the approval engine live
//! here, with no web server or database dependencies. The only outbound I/O is
//! the exchange rate client, used for display amounts.
//!
//! # Modules
//!
//! - `expense` - Expense types and submission validation
//! - `directory` - User directory seam
//! - `workflow` - Approval steps, resolution, aggregation and the engine
//! - `store` - Atomic per-expense persistence
//! - `currency` - Exchange rates and conversion

pub mod currency;
pub mod directory;
pub mod expense;
pub mod store;
pub mod workflow;
