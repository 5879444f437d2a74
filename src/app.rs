//! Wires configuration, providers, the rate cache and precache state together.

use crate::convert::{self, Conversion, ConversionRequest};
use crate::core::cache::RateCache;
use crate::core::config::AppConfig;
use crate::core::currency::{ALL_CURRENCIES, RateTableProvider};
use crate::core::error::RateResult;
use crate::precache::{self, PrecacheReport, PrecacheState};
use crate::providers::Providers;
use crate::store;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

pub struct App {
    pub config: AppConfig,
    pub cache: RateCache,
    providers: Providers,
    precache_source: Arc<dyn RateTableProvider>,
    precache_state: PrecacheState,
}

impl App {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let cache_path = config.cache_file_path()?;
        debug!("Using rate cache at {}", cache_path.display());

        let providers = Providers::from_config(&config)?;
        let precache_source = Arc::new(Providers::precache_source(&config)?);

        Ok(Self::new(
            config,
            store::file_cache(&cache_path),
            providers,
            precache_source,
        ))
    }

    pub fn new(
        config: AppConfig,
        cache: RateCache,
        providers: Providers,
        precache_source: Arc<dyn RateTableProvider>,
    ) -> Self {
        Self {
            config,
            cache,
            providers,
            precache_source,
            precache_state: PrecacheState::new(),
        }
    }

    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Handles one conversion. The first call of each UTC day also makes sure
    /// yesterday's rates are cached before the volatility lookup.
    pub async fn convert(&self, request: &ConversionRequest) -> RateResult<Conversion> {
        self.convert_on(request, Self::today()).await
    }

    pub async fn convert_on(
        &self,
        request: &ConversionRequest,
        today: NaiveDate,
    ) -> RateResult<Conversion> {
        precache::ensure_precached(
            &self.precache_state,
            &self.cache,
            self.precache_source.as_ref(),
            &ALL_CURRENCIES,
            today,
        )
        .await;

        let provider = self.providers.get(request.api);
        convert::convert(request, provider.as_ref(), &self.cache, today).await
    }

    pub async fn precache(
        &self,
        force: bool,
        on_progress: &(dyn Fn() + Send + Sync),
    ) -> RateResult<PrecacheReport> {
        precache::precache(
            &self.cache,
            self.precache_source.as_ref(),
            &ALL_CURRENCIES,
            Self::today(),
            force,
            on_progress,
        )
        .await
    }
}
