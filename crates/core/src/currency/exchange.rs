//! Exchange rate types and logic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendflow_shared::Currency;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Exchange rate (1 from = rate to).
    pub rate: Decimal,
    /// When the provider published or we fetched this rate.
    pub as_of: DateTime<Utc>,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(from: Currency, to: Currency, rate: Decimal, as_of: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            rate,
            as_of,
        }
    }

    /// The 1:1 rate of a currency to itself.
    #[must_use]
    pub fn identity(currency: Currency) -> Self {
        Self::new(currency, currency, Decimal::ONE, Utc::now())
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        Decimal::ONE.checked_div(self.rate).map(|rate| Self {
            from: self.to,
            to: self.from,
            rate,
            as_of: self.as_of,
        })
    }

    /// Returns true if the rate is usable for conversion.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.rate > Decimal::ZERO
    }
}
