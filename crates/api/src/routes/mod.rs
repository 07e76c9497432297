//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod approvals;
pub mod currency;
pub mod expenses;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(expenses::routes())
        .merge(approvals::routes())
        .merge(currency::routes())
}
