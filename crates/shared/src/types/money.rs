//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g. `150.00` EUR).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes accepted for expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Indian Rupee
    Inr,
    /// Japanese Yen
    Jpy,
    /// Indonesian Rupiah
    Idr,
    /// Singapore Dollar
    Sgd,
    /// Canadian Dollar
    Cad,
    /// Australian Dollar
    Aud,
    /// Swiss Franc
    Chf,
}

impl Currency {
    /// Every supported currency, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Usd,
        Self::Eur,
        Self::Gbp,
        Self::Inr,
        Self::Jpy,
        Self::Idr,
        Self::Sgd,
        Self::Cad,
        Self::Aud,
        Self::Chf,
    ];

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Inr => "INR",
            Self::Jpy => "JPY",
            Self::Idr => "IDR",
            Self::Sgd => "SGD",
            Self::Cad => "CAD",
            Self::Aud => "AUD",
            Self::Chf => "CHF",
        }
    }

    /// Number of decimal places in the currency's minor unit (ISO 4217).
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Jpy => 0,
            _ => 2,
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| format!("Unknown currency: {s}"))
    }
}
