use crate::core::cache::{RateEntries, RateStore};
use crate::core::error::RateResult;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate store. Nothing survives the process.
pub struct MemoryStore {
    inner: Mutex<RateEntries>,
}

impl MemoryStore {
    /// Creates an empty MemoryStore
    pub fn new() -> Self {
        Self::with_entries(RateEntries::new())
    }

    /// Creates a MemoryStore pre-populated with `entries`
    pub fn with_entries(entries: RateEntries) -> Self {
        Self {
            inner: Mutex::new(entries),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn load(&self) -> RateResult<RateEntries> {
        let entries = self.inner.lock().await;
        debug!("Loaded {} cached rates from memory", entries.len());
        Ok(entries.clone())
    }

    async fn save(&self, entries: &RateEntries) -> RateResult<()> {
        let mut inner = self.inner.lock().await;
        *inner = entries.clone();
        debug!("Saved {} cached rates to memory", inner.len());
        Ok(())
    }
}
