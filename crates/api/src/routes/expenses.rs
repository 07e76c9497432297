//! Expense submission and query routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{info, warn};

use spendflow_core::expense::{ExpenseCategory, NewExpense};
use spendflow_core::workflow::{ExpenseStatus, ExpenseView};
use spendflow_shared::{AppError, Currency, ExpenseId, Money, UserId};

use crate::AppState;
use crate::error::{app_error_response, workflow_error_response};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/users/{user_id}/expenses", get(list_user_expenses))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// The submitting employee.
    pub submitter_id: UserId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Amount in major units.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Category name; defaults to Other.
    pub category: Option<String>,
    /// Date incurred; defaults to today.
    pub incurred_on: Option<NaiveDate>,
}

/// Query parameters for listing expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Pending, Approved or Rejected.
    pub status: Option<String>,
}

/// An expense with its best-effort display amount.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// The expense and its steps.
    #[serde(flatten)]
    pub expense: ExpenseView,
    /// Amount in the display currency; absent if conversion failed.
    pub display_amount: Option<Money>,
}

/// Attaches a display amount. Conversion failures are logged and dropped.
pub(crate) async fn with_display_amount(state: &AppState, view: ExpenseView) -> ExpenseResponse {
    let display_amount = match state
        .converter
        .convert(view.expense.money(), state.display_currency)
        .await
    {
        Ok(money) => Some(money),
        Err(e) => {
            warn!(expense_id = %view.expense.id, error = %e, "Display conversion failed");
            None
        }
    };
    ExpenseResponse {
        expense: view,
        display_amount,
    }
}

async fn with_display_amounts(state: &AppState, views: Vec<ExpenseView>) -> Vec<ExpenseResponse> {
    join_all(views.into_iter().map(|v| with_display_amount(state, v))).await
}

fn parse_request(payload: CreateExpenseRequest) -> Result<NewExpense, AppError> {
    let currency = Currency::from_str(&payload.currency).map_err(AppError::Validation)?;
    let category = match payload.category.as_deref() {
        None => ExpenseCategory::default(),
        Some(raw) => ExpenseCategory::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown category: {raw}")))?,
    };

    Ok(NewExpense {
        submitter_id: payload.submitter_id,
        title: payload.title,
        description: payload.description,
        amount: payload.amount,
        currency,
        category,
        incurred_on: payload
            .incurred_on
            .unwrap_or_else(|| Utc::now().date_naive()),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/expenses` - Submit an expense for approval.
async fn create_expense(
    State(state): State<AppState>,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let input = match parse_request(payload) {
        Ok(input) => input,
        Err(e) => return app_error_response(&e),
    };

    match state.engine.submit_expense(input) {
        Ok(view) => {
            info!(
                expense_id = %view.expense.id,
                steps = view.steps.len(),
                "Expense created"
            );
            let response = with_display_amount(&state, view).await;
            (StatusCode::CREATED, Json(json!(response))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to submit expense");
            workflow_error_response(&e)
        }
    }
}

/// GET `/expenses` - All expenses, optionally filtered by status.
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListExpensesQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match ExpenseStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return app_error_response(&AppError::Validation(format!(
                    "Unknown status filter: {raw}"
                )));
            }
        },
    };

    match state.engine.list_all(status) {
        Ok(views) => {
            let expenses = with_display_amounts(&state, views).await;
            (StatusCode::OK, Json(json!({ "expenses": expenses }))).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}

/// GET `/expenses/{expense_id}` - One expense with its steps.
async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<ExpenseId>,
) -> impl IntoResponse {
    match state.engine.get_expense(expense_id) {
        Ok(view) => {
            let response = with_display_amount(&state, view).await;
            (StatusCode::OK, Json(json!(response))).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}

/// GET `/users/{user_id}/expenses` - A submitter's history, newest first.
async fn list_user_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    match state.engine.get_history(user_id) {
        Ok(views) => {
            let expenses = with_display_amounts(&state, views).await;
            (StatusCode::OK, Json(json!({ "expenses": expenses }))).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}
