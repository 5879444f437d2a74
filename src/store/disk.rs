use crate::core::cache::{RateEntries, RateStore};
use crate::core::error::{RateError, RateResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Rate store persisted as a single flat JSON object.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "rates_cache.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RateStore for JsonFileStore {
    async fn load(&self) -> RateResult<RateEntries> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No rate cache at {}, starting empty", self.path.display());
                return Ok(RateEntries::new());
            }
            Err(e) => {
                return Err(RateError::CacheUnavailable(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        match serde_json::from_str::<RateEntries>(&text) {
            Ok(entries) => {
                debug!(
                    "Loaded {} cached rates from {}",
                    entries.len(),
                    self.path.display()
                );
                Ok(entries)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Malformed rate cache, treating as empty"
                );
                Ok(RateEntries::new())
            }
        }
    }

    async fn save(&self, entries: &RateEntries) -> RateResult<()> {
        let body = serde_json::to_string(entries)
            .map_err(|e| RateError::CacheUnavailable(format!("failed to serialize cache: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, body).await.map_err(|e| {
            RateError::CacheUnavailable(format!("failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            RateError::CacheUnavailable(format!(
                "failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Saved {} cached rates to {}", entries.len(), self.path.display());
        Ok(())
    }
}
