use crate::core::currency::{CurrencyRateProvider, ProviderKind, RateTable, RateTableProvider};
use crate::core::error::{RateError, RateResult};
use crate::providers::util::{http_client, with_retry};
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PROVIDER_NAME: &str = "Open ER";

/// Global provider. One call returns every rate for a base currency.
pub struct OpenErProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
}

impl OpenErProvider {
    pub fn new(base_url: &str, timeout: Duration, retries: usize) -> anyhow::Result<Self> {
        let client = http_client(timeout).context("Failed to build Open ER HTTP client")?;
        Ok(OpenErProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retries,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateTableProvider for OpenErProvider {
    #[instrument(name = "OpenErLatest", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> RateTable {
        let url = format!("{}/latest/{}", self.base_url, base);
        debug!("Requesting rate table from {}", url);

        let response = match with_retry(|| self.client.get(&url).send(), self.retries, 500).await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Open ER request failed");
                return RateTable::TransportFailure(format!("request error: {e}"));
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return RateTable::TransportFailure(format!("failed to read body: {e}")),
        };

        match serde_json::from_str::<LatestResponse>(&text) {
            Ok(data) if data.result == "success" => {
                debug!("Received {} rates for {}", data.rates.len(), base);
                RateTable::Success(data.rates)
            }
            Ok(data) => {
                debug!(
                    result = %data.result,
                    error_type = ?data.error_type,
                    "Open ER rejected base currency"
                );
                RateTable::InvalidBase
            }
            Err(_) if !status.is_success() => {
                RateTable::TransportFailure(format!("HTTP error: {status}"))
            }
            Err(e) => RateTable::TransportFailure(format!("failed to parse response: {e}")),
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for OpenErProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenEr
    }

    async fn get_rate(&self, from: &str, to: &str) -> RateResult<f64> {
        match self.latest_rates(from).await {
            RateTable::Success(rates) => rates
                .get(to)
                .copied()
                .filter(|rate| *rate > 0.0)
                .ok_or_else(|| RateError::UnsupportedTarget {
                    provider: PROVIDER_NAME.to_string(),
                    currency: to.to_string(),
                }),
            RateTable::InvalidBase => Err(RateError::InvalidBase(from.to_string())),
            RateTable::TransportFailure(reason) => Err(RateError::ProviderUnreachable {
                provider: PROVIDER_NAME.to_string(),
                reason,
            }),
        }
    }
}
