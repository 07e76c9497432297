//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the approval engine
//! - Error responses
//! - Best-effort display currency conversion

pub mod error;
pub mod routes;

use axum::{Router, http::Uri, response::Response};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use spendflow_core::currency::CurrencyConverter;
use spendflow_core::store::InMemoryExpenseStore;
use spendflow_core::workflow::ApprovalEngine;
use spendflow_shared::{AppError, Currency};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Approval engine over the expense store.
    pub engine: Arc<ApprovalEngine<InMemoryExpenseStore>>,
    /// Exchange rate source for display amounts.
    pub converter: Arc<dyn CurrencyConverter>,
    /// Currency display amounts are shown in.
    pub display_currency: Currency,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> Response {
    error::app_error_response(&AppError::NotFound(format!("No route for {uri}")))
}
