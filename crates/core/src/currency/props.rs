//! Property-based tests for currency conversion.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use spendflow_shared::{Currency, Money};

use super::conversion::{convert_amount, convert_money};
use super::exchange::ExchangeRate;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn arb_currency() -> impl Strategy<Value = Currency> {
    proptest::sample::select(Currency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converted money never carries more decimals than the target currency allows.
    #[test]
    fn prop_convert_rounds_to_minor_units(
        amount in positive_amount(),
        rate in positive_rate(),
        from in arb_currency(),
        to in arb_currency(),
    ) {
        let fx = ExchangeRate::new(from, to, rate, Utc::now());
        let converted = convert_money(Money::new(amount, from), &fx).unwrap();
        prop_assert_eq!(converted.currency, to);
        prop_assert!(converted.amount.normalize().scale() <= to.minor_units());
    }

    /// Rounding never moves the result by more than half a minor unit.
    #[test]
    fn prop_rounding_error_is_bounded(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let exact = amount * rate;
        let rounded = convert_amount(amount, rate, 2);
        prop_assert!((exact - rounded).abs() <= Decimal::new(5, 3));
    }

    /// A rate of one preserves amounts already at two decimal places.
    #[test]
    fn prop_unit_rate_preserves_amount(amount in positive_amount()) {
        prop_assert_eq!(convert_amount(amount, Decimal::ONE, 2), amount);
    }

    /// Positive amounts at positive rates stay non-negative.
    #[test]
    fn prop_positive_inputs_non_negative_output(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        prop_assert!(convert_amount(amount, rate, 2) >= Decimal::ZERO);
    }
}
