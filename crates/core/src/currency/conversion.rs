//! Currency conversion logic.
//!
//! Rounding strategy:
//! - Always round to the target currency's minor units
//! - Use banker's rounding (round half to even)

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use spendflow_shared::Money;

use super::error::FxError;
use super::exchange::ExchangeRate;

/// Converts an amount using the given exchange rate.
///
/// Uses banker's rounding (round half to even) to minimize cumulative errors.
#[must_use]
pub fn convert_amount(amount: Decimal, rate: Decimal, decimal_places: u32) -> Decimal {
    let converted = amount * rate;
    converted.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Converts money with a rate, rounding to the target currency's minor units.
///
/// # Errors
/// * `FxError::CurrencyMismatch` if the money is not in the rate's source currency
/// * `FxError::InvalidRate` for a zero or negative rate
pub fn convert_money(money: Money, rate: &ExchangeRate) -> Result<Money, FxError> {
    if money.currency != rate.from {
        return Err(FxError::CurrencyMismatch {
            expected: rate.from,
            actual: money.currency,
        });
    }
    if !rate.is_valid() {
        return Err(FxError::InvalidRate {
            from: rate.from,
            to: rate.to,
        });
    }

    let amount = convert_amount(money.amount, rate.rate, rate.to.minor_units());
    Ok(Money::new(amount, rate.to))
}
