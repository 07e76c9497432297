//! Currency conversion routes.
//!
//! Informational only; conversion failures never touch approval state.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::warn;

use spendflow_core::currency::convert_money;
use spendflow_shared::{AppError, Currency, Money};

use crate::AppState;
use crate::error::{app_error_response, fx_error_response};

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/currency/convert", get(convert))
        .route("/currency/supported", get(supported))
}

/// Query parameters for a conversion.
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Amount in the source currency.
    pub amount: Decimal,
}

/// Conversion result.
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    /// Original amount.
    pub original: Money,
    /// Converted amount.
    pub converted: Money,
    /// Rate applied (1 from = rate to).
    pub rate: Decimal,
    /// When the rate was fetched.
    pub as_of: DateTime<Utc>,
}

fn parse_currency(raw: &str) -> Result<Currency, AppError> {
    Currency::from_str(raw).map_err(AppError::Validation)
}

/// GET `/currency/convert` - Convert an amount at the current rate.
async fn convert(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> impl IntoResponse {
    let (from, to) = match (parse_currency(&query.from), parse_currency(&query.to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => return app_error_response(&e),
    };
    let original = Money::new(query.amount, from);

    let rate = match state.converter.rate(from, to).await {
        Ok(rate) => rate,
        Err(e) => {
            warn!(%from, %to, error = %e, "Exchange rate lookup failed");
            return fx_error_response(&e);
        }
    };

    match convert_money(original, &rate) {
        Ok(converted) => {
            let response = ConvertResponse {
                original,
                converted,
                rate: rate.rate,
                as_of: rate.as_of,
            };
            (StatusCode::OK, Json(json!(response))).into_response()
        }
        Err(e) => fx_error_response(&e),
    }
}

/// GET `/currency/supported` - Currency codes accepted for expenses.
async fn supported() -> impl IntoResponse {
    let currencies: Vec<&str> = Currency::ALL.iter().map(|c| c.code()).collect();
    Json(json!({ "currencies": currencies }))
}
