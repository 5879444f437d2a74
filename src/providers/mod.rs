pub mod frankfurter;
pub mod open_er;
pub mod util;

use crate::core::config::AppConfig;
use crate::core::currency::{CurrencyRateProvider, ProviderKind};
use anyhow::Result;
use frankfurter::FrankfurterProvider;
use open_er::OpenErProvider;
use std::sync::Arc;
use std::time::Duration;

/// Live-rate providers, selectable by `ProviderKind`.
pub struct Providers {
    open_er: Arc<OpenErProvider>,
    frankfurter: Arc<FrankfurterProvider>,
}

impl Providers {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        Ok(Self {
            open_er: Arc::new(OpenErProvider::new(
                &config.providers.open_er.base_url,
                timeout,
                config.retries,
            )?),
            frankfurter: Arc::new(FrankfurterProvider::new(
                &config.providers.frankfurter.base_url,
                timeout,
                config.retries,
            )?),
        })
    }

    pub fn get(&self, kind: ProviderKind) -> Arc<dyn CurrencyRateProvider> {
        match kind {
            ProviderKind::OpenEr => Arc::clone(&self.open_er) as Arc<dyn CurrencyRateProvider>,
            ProviderKind::Frankfurter => {
                Arc::clone(&self.frankfurter) as Arc<dyn CurrencyRateProvider>
            }
        }
    }

    /// Global provider configured for precache fetches: short timeout and no
    /// retries, since a failed base is simply skipped.
    pub fn precache_source(config: &AppConfig) -> Result<OpenErProvider> {
        OpenErProvider::new(
            &config.providers.open_er.base_url,
            Duration::from_secs(config.precache_timeout_secs),
            0,
        )
    }
}
