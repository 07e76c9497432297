//! Approval queue and decision routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use spendflow_core::workflow::Decision;
use spendflow_shared::{AppError, ApprovalStepId, UserId};

use crate::AppState;
use crate::error::{app_error_response, workflow_error_response};
use crate::routes::expenses::{ExpenseResponse, with_display_amount};

/// Creates the approval routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/approvals/{approver_id}", get(list_queue))
        .route("/approvals/steps/{step_id}", put(decide))
}

/// Request body for a decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// `approved` or `rejected`.
    pub decision: String,
    /// Optional comments.
    pub comments: Option<String>,
}

/// One queue row.
#[derive(Debug, Serialize)]
pub struct QueueItemResponse {
    /// The approver's waiting step.
    pub step_id: ApprovalStepId,
    /// The expense with its full step set.
    pub expense: ExpenseResponse,
}

/// GET `/approvals/{approver_id}` - Expenses waiting on this approver.
async fn list_queue(
    State(state): State<AppState>,
    Path(approver_id): Path<UserId>,
) -> impl IntoResponse {
    match state.engine.list_queue(approver_id) {
        Ok(items) => {
            let mut queue = Vec::with_capacity(items.len());
            for item in items {
                queue.push(QueueItemResponse {
                    step_id: item.step_id,
                    expense: with_display_amount(&state, item.expense).await,
                });
            }
            (StatusCode::OK, Json(json!({ "approvals": queue }))).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}

/// PUT `/approvals/steps/{step_id}` - Approve or reject a step.
async fn decide(
    State(state): State<AppState>,
    Path(step_id): Path<ApprovalStepId>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    let Some(decision) = Decision::parse(&payload.decision) else {
        return app_error_response(&AppError::Validation(format!(
            "Decision must be 'approved' or 'rejected', got '{}'",
            payload.decision
        )));
    };

    match state
        .engine
        .apply_decision(step_id, decision, payload.comments)
    {
        Ok(view) => {
            info!(%step_id, %decision, status = %view.status, "Decision recorded");
            let response = with_display_amount(&state, view).await;
            (StatusCode::OK, Json(json!(response))).into_response()
        }
        Err(e) => workflow_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use futures::future::join_all;
    use serde_json::json;

    use crate::routes::test_support::{TestApp, send, test_app};

    async fn submit(app: &TestApp, amount: &str) -> serde_json::Value {
        let (status, body) = send(
            &app.router,
            "POST",
            "/api/v1/expenses",
            Some(json!({
                "submitter_id": app.employee.to_string(),
                "title": "Conference Travel",
                "amount": amount,
                "currency": "EUR",
                "category": "Travel"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    fn decide_uri(step_id: &serde_json::Value) -> String {
        format!("/api/v1/approvals/steps/{}", step_id.as_str().unwrap())
    }

    #[tokio::test]
    async fn test_queue_lists_waiting_expenses() {
        let app = test_app();
        let expense = submit(&app, "150.00").await;

        let (status, body) =
            send(&app.router, "GET", &format!("/api/v1/approvals/{}", app.manager), None).await;
        assert_eq!(status, StatusCode::OK);
        let queue = body["approvals"].as_array().unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0]["step_id"], expense["steps"][0]["id"]);
        assert_eq!(queue[0]["expense"]["id"], expense["id"]);

        let (_, body) =
            send(&app.router, "GET", &format!("/api/v1/approvals/{}", app.admin), None).await;
        assert!(body["approvals"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_then_stale() {
        let app = test_app();
        let expense = submit(&app, "150.00").await;
        let uri = decide_uri(&expense["steps"][0]["id"]);

        let (status, body) = send(
            &app.router,
            "PUT",
            &uri,
            Some(json!({"decision": "approved", "comments": "Looks good"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Approved");
        assert_eq!(body["steps"][0]["comments"], "Looks good");

        let (status, body) =
            send(&app.router, "PUT", &uri, Some(json!({"decision": "rejected"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "STALE_DECISION");
    }

    #[tokio::test]
    async fn test_escalated_rejection_skips_peer() {
        let app = test_app();
        let expense = submit(&app, "750.00").await;
        assert_eq!(expense["steps"].as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app.router,
            "PUT",
            &decide_uri(&expense["steps"][1]["id"]),
            Some(json!({"decision": "rejected", "comments": "Over budget"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Rejected");
        assert_eq!(body["steps"][0]["status"], "Skipped");
        assert_eq!(body["steps"][1]["status"], "Rejected");
        assert_eq!(body["progress"]["decided_count"], 2);
    }

    #[tokio::test]
    async fn test_invalid_decision_and_unknown_step() {
        let app = test_app();
        let expense = submit(&app, "150.00").await;

        let (status, _) = send(
            &app.router,
            "PUT",
            &decide_uri(&expense["steps"][0]["id"]),
            Some(json!({"decision": "maybe"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = spendflow_shared::ApprovalStepId::new();
        let (status, body) = send(
            &app.router,
            "PUT",
            &format!("/api/v1/approvals/steps/{unknown}"),
            Some(json!({"decision": "approved"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "STEP_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_concurrent_decisions_exactly_one_wins() {
        let app = test_app();
        let expense = submit(&app, "150.00").await;
        let uri = decide_uri(&expense["steps"][0]["id"]);

        let requests = (0..6).map(|i| {
            let decision = if i % 2 == 0 { "approved" } else { "rejected" };
            send(&app.router, "PUT", &uri, Some(json!({ "decision": decision })))
        });
        let results = join_all(requests).await;

        let ok = results.iter().filter(|(s, _)| *s == StatusCode::OK).count();
        let conflicts = results
            .iter()
            .filter(|(s, _)| *s == StatusCode::CONFLICT)
            .count();
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 5);
    }
}
