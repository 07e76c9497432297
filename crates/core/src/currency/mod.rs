//! Multi-currency handling and exchange rates.
//!
//! Conversion is display-only: approval thresholds compare amounts in the
//! expense's own currency and never consult a converter.

pub mod client;
pub mod conversion;
pub mod converter;
pub mod error;
pub mod exchange;

#[cfg(test)]
mod props;

pub use client::{ExchangeRateClient, RateTable};
pub use conversion::{convert_amount, convert_money};
pub use converter::{CurrencyConverter, FixedRateConverter};
pub use error::FxError;
pub use exchange::ExchangeRate;
