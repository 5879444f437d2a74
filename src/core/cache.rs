//! Date-keyed exchange rate cache

use crate::core::error::{RateError, RateResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Flat mapping of `"{BASE}_{TARGET}_{YYYY-MM-DD}"` to a rate, as persisted.
pub type RateEntries = BTreeMap<String, f64>;

/// Directed (base, target, date) triple. `USD→EUR` and `EUR→USD` are
/// distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RateKey {
    pub base: String,
    pub target: String,
    pub date: NaiveDate,
}

impl RateKey {
    pub fn new(base: &str, target: &str, date: NaiveDate) -> Self {
        Self {
            base: base.to_string(),
            target: target.to_string(),
            date,
        }
    }
}

impl Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.base,
            self.target,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Backing storage for the whole cache. Implementations read and write the
/// complete mapping; there are no partial writes.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn load(&self) -> RateResult<RateEntries>;
    async fn save(&self, entries: &RateEntries) -> RateResult<()>;
}

/// Serializes load/modify/save cycles against one store. This only guards
/// callers sharing the same `RateCache`; other processes writing the same
/// file can still interleave, and the last writer wins.
pub struct RateCache {
    store: Arc<dyn RateStore>,
    guard: Mutex<()>,
}

impl RateCache {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    pub async fn load(&self) -> RateResult<RateEntries> {
        let _lock = self.guard.lock().await;
        self.store.load().await
    }

    pub async fn get(&self, key: &RateKey) -> RateResult<Option<f64>> {
        let entries = self.load().await?;
        let value = entries.get(&key.to_string()).copied();
        if value.is_some() {
            debug!("Cache HIT for key: {}", key);
        } else {
            debug!("Cache MISS for key: {}", key);
        }
        Ok(value)
    }

    /// Overwrites any existing rate for `key`.
    pub async fn put(&self, key: RateKey, rate: f64) -> RateResult<()> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(RateError::InvalidInput(format!(
                "refusing to cache non-positive rate {rate} for {key}"
            )));
        }
        self.update(|entries| {
            debug!("Cache PUT for key: {}", key);
            entries.insert(key.to_string(), rate);
        })
        .await
    }

    /// Loads the whole store, applies `f`, and saves the result while holding
    /// the cache lock.
    pub async fn update<F, R>(&self, f: F) -> RateResult<R>
    where
        F: FnOnce(&mut RateEntries) -> R + Send,
        R: Send,
    {
        let _lock = self.guard.lock().await;
        let mut entries = self.store.load().await?;
        let result = f(&mut entries);
        self.store.save(&entries).await?;
        Ok(result)
    }
}
