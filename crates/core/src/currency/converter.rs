//! The currency conversion seam.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use spendflow_shared::{Currency, Money};

use super::conversion::convert_money;
use super::error::FxError;
use super::exchange::ExchangeRate;

/// Source of exchange rates.
///
/// Only used for display amounts; approval never waits on it.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    /// Current rate from `from` to `to`.
    async fn rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate, FxError>;

    /// Converts money into `to`. Same-currency conversion never looks up a rate.
    async fn convert(&self, money: Money, to: Currency) -> Result<Money, FxError> {
        if money.currency == to {
            return Ok(money);
        }
        let rate = self.rate(money.currency, to).await?;
        convert_money(money, &rate)
    }
}

/// Converter over a fixed rate table. Reverse pairs are derived by inversion.
#[derive(Debug, Clone, Default)]
pub struct FixedRateConverter {
    rates: HashMap<(Currency, Currency), Decimal>,
}

impl FixedRateConverter {
    /// Creates an empty converter; only same-currency conversions succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate (1 `from` = `rate` `to`).
    #[must_use]
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }
}

#[async_trait]
impl CurrencyConverter for FixedRateConverter {
    async fn rate(&self, from: Currency, to: Currency) -> Result<ExchangeRate, FxError> {
        if from == to {
            return Ok(ExchangeRate::identity(from));
        }
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Ok(ExchangeRate::new(from, to, *rate, chrono::Utc::now()));
        }
        self.rates
            .get(&(to, from))
            .and_then(|rate| ExchangeRate::new(to, from, *rate, chrono::Utc::now()).inverse())
            .ok_or(FxError::UnsupportedPair { from, to })
    }
}
