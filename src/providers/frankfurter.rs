use crate::core::currency::{CurrencyRateProvider, ProviderKind};
use crate::core::error::{RateError, RateResult};
use crate::providers::util::{http_client, with_retry};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER_NAME: &str = "Frankfurter";

/// ECB-backed provider. Quotes one pair per request and only knows the
/// restricted currency subset.
pub struct FrankfurterProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str, timeout: Duration, retries: usize) -> anyhow::Result<Self> {
        let client = http_client(timeout).context("Failed to build Frankfurter HTTP client")?;
        Ok(FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries,
        })
    }

    fn unreachable(reason: String) -> RateError {
        RateError::ProviderUnreachable {
            provider: PROVIDER_NAME.to_string(),
            reason,
        }
    }

    fn unsupported(from: &str, to: &str) -> RateError {
        // Name whichever side of the pair the provider is not known to quote
        let currency = if ProviderKind::Frankfurter.supports(from) {
            to
        } else {
            from
        };
        RateError::UnsupportedTarget {
            provider: PROVIDER_NAME.to_string(),
            currency: currency.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
    message: Option<String>,
}

#[async_trait]
impl CurrencyRateProvider for FrankfurterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Frankfurter
    }

    #[instrument(name = "FrankfurterLatest", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(&self, from: &str, to: &str) -> RateResult<f64> {
        if from == to {
            if ProviderKind::Frankfurter.supports(from) {
                return Ok(1.0);
            }
            return Err(Self::unsupported(from, to));
        }

        let url = Url::parse_with_params(
            &format!("{}/latest", self.base_url),
            &[("from", from), ("to", to)],
        )
        .map_err(|e| Self::unreachable(format!("invalid base url {}: {e}", self.base_url)))?;
        debug!("Requesting currency rate from {}", url);

        let response = with_retry(|| self.client.get(url.clone()).send(), self.retries, 500)
            .await
            .map_err(|e| Self::unreachable(format!("request error: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Self::unreachable(format!("failed to read body: {e}")))?;

        let data = match serde_json::from_str::<LatestResponse>(&text) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(Self::unreachable(format!("HTTP error: {status}")));
            }
            Err(e) => return Err(Self::unreachable(format!("failed to parse response: {e}"))),
        };

        if let Some(message) = &data.message {
            debug!(%status, message = %message, "Frankfurter returned an error body");
        }

        data.rates
            .get(to)
            .copied()
            .filter(|rate| *rate > 0.0)
            .ok_or_else(|| Self::unsupported(from, to))
    }
}
