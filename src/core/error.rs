//! Error kinds surfaced by rate lookups, the rate cache and conversions.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateError {
    /// The provider rejected or could not resolve the base currency.
    #[error("Invalid base currency: {0}")]
    InvalidBase(String),

    /// The target currency is missing from the provider's answer.
    #[error("Currency not supported by {provider}: {currency}")]
    UnsupportedTarget { provider: String, currency: String },

    /// Network failure, timeout or an unusable response body.
    #[error("{provider} is unreachable: {reason}")]
    ProviderUnreachable { provider: String, reason: String },

    #[error("Rate cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for RateError {
    fn from(e: std::io::Error) -> Self {
        RateError::CacheUnavailable(e.to_string())
    }
}

pub type RateResult<T> = Result<T, RateError>;
