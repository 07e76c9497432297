//! HTTP exchange rate client.
//!
//! Talks to an exchangerate-api compatible endpoint:
//! `GET {base_url}/latest/{FROM}` answering `{"base": "USD", "rates": {"EUR": 0.92, ...}}`.
//! Rate tables are cached per base currency.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use spendflow_shared::{Currency, FxConfig};

use super::converter::CurrencyConverter;
use super::error::FxError;
use super::exchange::ExchangeRate;

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, serde_json::Number>,
}

/// Rates from one base currency, as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    /// Base currency.
    pub base: Currency,
    /// 1 base = rate target. Unknown currency codes are dropped.
    pub rates: HashMap<Currency, Decimal>,
    /// When the table was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl RateTable {
    fn from_response(base: Currency, response: LatestRatesResponse, fetched_at: DateTime<Utc>) -> Self {
        let rates = response
            .rates
            .into_iter()
            .filter_map(|(code, value)| {
                let currency = Currency::from_str(&code).ok()?;
                let raw = value.to_string();
                let rate = Decimal::from_str(&raw)
                    .or_else(|_| Decimal::from_scientific(&raw))
                    .ok()?;
                Some((currency, rate))
            })
            .collect();

        Self {
            base,
            rates,
            fetched_at,
        }
    }

    /// Looks up the rate to `to`.
    ///
    /// # Errors
    /// * `FxError::UnsupportedPair` if the table has no entry
    /// * `FxError::InvalidRate` for a zero or negative entry
    pub fn rate_to(&self, to: Currency) -> Result<ExchangeRate, FxError> {
        let rate = self.rates.get(&to).ok_or(FxError::UnsupportedPair {
            from: self.base,
            to,
        })?;
        let rate = ExchangeRate::new(self.base, to, *rate, self.fetched_at);
        if !rate.is_valid() {
            return Err(FxError::InvalidRate {
                from: self.base,
                to,
            });
        }
        Ok(rate)
    }
}

/// Cached client for a remote rate provider.
#[derive(Clone)]
pub struct ExchangeRateClient {
    http: Client,
    base_url: String,
    cache: Cache<Currency, Arc<RateTable>>,
}

impl ExchangeRateClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    /// * `FxError::Upstream` if the HTTP client cannot be constructed
    pub fn from_config(config: &FxConfig) -> Result<Self, FxError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FxError::Upstream(e.to_string()))?;

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Rate table for `base`, from cache or the provider.
    ///
    /// # Errors
    /// * `FxError::Upstream` if the provider cannot be reached
    /// * `FxError::InvalidResponse` if its answer cannot be parsed
    pub async fn table(&self, base: Currency) -> Result<Arc<RateTable>, FxError> {
        self.cache
            .try_get_with(base, self.fetch(base))
            .await
            .map_err(|err| (*err).clone())
    }

    async fn fetch(&self, base: Currency) -> Result<Arc<RateTable>, FxError> {
        let url = format!("{}/latest/{}", self.base_url, base.code());
        debug!(%url, "Fetching exchange rates");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(%base, error = %e, "Exchange rate request failed");
                FxError::Upstream(e.to_string())
            })?;

        let body: LatestRatesResponse = response
            .json()
            .await
            .map_err(|e| FxError::InvalidResponse(e.to_string()))?;

        let table = RateTable::from_response(base, body, Utc::now());
        debug!(%base, rates = table.rates.len(), "Exchange rates cached");
        Ok(Arc::new(table))
    }
}

#[async_trait]
impl CurrencyConverter for ExchangeRateClient {
    async fn rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate, FxError> {
        if from == to {
            return Ok(ExchangeRate::identity(from));
        }
        self.table(from).await?.rate_to(to)
    }
}
