//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod volatility;

// Re-export main types for cleaner imports
pub use cache::{RateCache, RateKey, RateStore};
pub use currency::{CurrencyRateProvider, ProviderKind, RateTable, RateTableProvider};
pub use error::{RateError, RateResult};
pub use volatility::{Volatility, VolatilityLevel, classify};
