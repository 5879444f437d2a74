//! Single conversion: live rate, formatted output, cache write, volatility.

use crate::core::cache::{RateCache, RateKey};
use crate::core::currency::{CurrencyRateProvider, ProviderKind};
use crate::core::error::{RateError, RateResult};
use crate::core::volatility::{Volatility, classify};
use crate::precache::yesterday_of;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub api: ProviderKind,
}

impl ConversionRequest {
    /// Validates raw user input. Currency codes are only checked for being
    /// present; whether a provider quotes them is the provider's call.
    pub fn parse(amount: &str, from: &str, to: &str, api: ProviderKind) -> RateResult<Self> {
        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| RateError::InvalidInput(format!("amount '{amount}' is not a number")))?;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(RateError::InvalidInput(format!(
                "amount must be a positive number, got {amount}"
            )));
        }

        let from = normalize_code(from, "from")?;
        let to = normalize_code(to, "to")?;

        Ok(Self {
            amount,
            from,
            to,
            api,
        })
    }
}

fn normalize_code(code: &str, field: &str) -> RateResult<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(RateError::InvalidInput(format!(
            "{field} currency must not be empty"
        )));
    }
    Ok(code.to_uppercase())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub api: ProviderKind,
    pub rate: f64,
    pub converted: f64,
    pub output: String,
    pub volatility: Volatility,
}

/// Converts `request.amount` with the live rate from `provider`, records
/// today's rate and classifies it against yesterday's cached rate.
///
/// Provider failures return before anything is written to the cache.
#[instrument(skip(provider, cache), fields(from = %request.from, to = %request.to))]
pub async fn convert(
    request: &ConversionRequest,
    provider: &dyn CurrencyRateProvider,
    cache: &RateCache,
    today: NaiveDate,
) -> RateResult<Conversion> {
    let rate = provider.get_rate(&request.from, &request.to).await?;
    let converted = request.amount * rate;
    let output = format!(
        "{} {} = {:.2} {}",
        request.amount, request.from, converted, request.to
    );
    debug!(provider = %provider.kind(), "{}", output);

    let realized_rate = converted / request.amount;
    cache
        .put(RateKey::new(&request.from, &request.to, today), realized_rate)
        .await?;

    let past = cache
        .get(&RateKey::new(&request.from, &request.to, yesterday_of(today)))
        .await?;
    let volatility = classify(realized_rate, past);

    Ok(Conversion {
        amount: request.amount,
        from: request.from.clone(),
        to: request.to.clone(),
        api: request.api,
        rate,
        converted,
        output,
        volatility,
    })
}
