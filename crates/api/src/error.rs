//! Error responses.
//!
//! Every error body is `{"error": CODE, "message": text}` with the status code
//! the domain error reports for itself.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use spendflow_core::currency::FxError;
use spendflow_core::workflow::WorkflowError;
use spendflow_shared::AppError;

fn error_response(status: u16, code: &str, message: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

/// Response for a workflow failure.
pub fn workflow_error_response(e: &WorkflowError) -> Response {
    if e.is_retryable() {
        error!(error = %e, "Expense store failure");
    }
    error_response(e.status_code(), e.error_code(), e.to_string())
}

/// Response for a currency conversion failure.
pub fn fx_error_response(e: &FxError) -> Response {
    error_response(e.status_code(), e.error_code(), e.to_string())
}

/// Response for a request-level failure.
pub fn app_error_response(e: &AppError) -> Response {
    let message = match e {
        AppError::Internal(_) | AppError::Config(_) => {
            error!(error = %e, "Internal error");
            "An error occurred".to_string()
        }
        AppError::NotFound(m) | AppError::Validation(m) => m.clone(),
    };
    error_response(e.status_code(), e.error_code(), message)
}
