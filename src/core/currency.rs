//! Currency universe and rate provider abstractions

use crate::core::error::RateResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Every currency the precache matrix covers, in display order.
pub const ALL_CURRENCIES: [&str; 14] = [
    "USD", "MYR", "EUR", "GBP", "JPY", "SGD", "AUD", "CAD", "CHF", "NZD", "CNY", "HKD", "INR",
    "KRW",
];

/// Currencies the ECB-backed provider is known to quote.
pub const RESTRICTED_CURRENCIES: [&str; 9] = [
    "USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "NZD", "SGD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Global provider, quotes the whole universe.
    #[default]
    OpenEr,
    /// ECB-restricted provider.
    Frankfurter,
}

impl ProviderKind {
    pub fn supports(&self, code: &str) -> bool {
        match self {
            ProviderKind::OpenEr => ALL_CURRENCIES.contains(&code),
            ProviderKind::Frankfurter => RESTRICTED_CURRENCIES.contains(&code),
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ProviderKind::OpenEr => "Open ER API (Global)",
                ProviderKind::Frankfurter => "Frankfurter API (ECB)",
            }
        )
    }
}

/// Result of asking the global provider for every rate against one base.
#[derive(Debug, Clone, PartialEq)]
pub enum RateTable {
    Success(HashMap<String, f64>),
    InvalidBase,
    TransportFailure(String),
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Units of `to` per unit of `from`.
    async fn get_rate(&self, from: &str, to: &str) -> RateResult<f64>;
}

/// Providers able to return a full rate table for a base in one call.
#[async_trait]
pub trait RateTableProvider: Send + Sync {
    async fn latest_rates(&self, base: &str) -> RateTable;
}
