//! Currency conversion errors.

use thiserror::Error;

use spendflow_shared::Currency;

/// Errors raised while looking up rates or converting amounts.
///
/// Conversion is display-only; none of these ever reach the approval path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// No rate is known for the pair.
    #[error("No exchange rate available from {from} to {to}")]
    UnsupportedPair {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// The rate provider returned a zero or negative rate.
    #[error("Invalid exchange rate from {from} to {to}")]
    InvalidRate {
        /// Source currency.
        from: Currency,
        /// Target currency.
        to: Currency,
    },

    /// A rate was applied to money in the wrong currency.
    #[error("Rate expects {expected}, got {actual}")]
    CurrencyMismatch {
        /// The rate's source currency.
        expected: Currency,
        /// The money's currency.
        actual: Currency,
    },

    /// The rate provider could not be reached or answered with an error.
    #[error("Exchange rate provider unavailable: {0}")]
    Upstream(String),

    /// The rate provider's response could not be understood.
    #[error("Invalid exchange rate response: {0}")]
    InvalidResponse(String),
}

impl FxError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedPair { .. } => 422,
            Self::CurrencyMismatch { .. } => 400,
            Self::InvalidRate { .. } | Self::Upstream(_) | Self::InvalidResponse(_) => 502,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedPair { .. } => "UNSUPPORTED_CURRENCY_PAIR",
            Self::InvalidRate { .. } => "INVALID_EXCHANGE_RATE",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::Upstream(_) | Self::InvalidResponse(_) => "FX_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_is_bad_gateway() {
        let err = FxError::Upstream("connection refused".into());
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.error_code(), "FX_UNAVAILABLE");
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_unsupported_pair() {
        let err = FxError::UnsupportedPair {
            from: Currency::Usd,
            to: Currency::Idr,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_string(), "No exchange rate available from USD to IDR");
    }
}
