//! Backfills yesterday's cross rates so conversions have a volatility baseline.

use crate::core::cache::{RateCache, RateEntries, RateKey};
use crate::core::currency::{RateTable, RateTableProvider};
use crate::core::error::RateResult;
use chrono::{Duration, NaiveDate};
use futures::future::join_all;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct PrecacheReport {
    /// Date the backfilled rates are keyed under.
    pub date: NaiveDate,
    /// True when the cache already held the full matrix and nothing was fetched.
    pub skipped: bool,
    pub fetched_bases: Vec<String>,
    pub failed_bases: Vec<String>,
    /// Entries added to the cache.
    pub written: usize,
}

impl PrecacheReport {
    fn skipped(date: NaiveDate) -> Self {
        Self {
            date,
            skipped: true,
            fetched_bases: Vec::new(),
            failed_bases: Vec::new(),
            written: 0,
        }
    }
}

/// Tracks whether the per-day precache check already ran for this process.
///
/// The state starts unchecked, is marked with the UTC day after a successful
/// check, and counts as unchecked again once the day rolls over.
#[derive(Debug, Default)]
pub struct PrecacheState {
    checked_on: Mutex<Option<NaiveDate>>,
}

impl PrecacheState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_done(&self, today: NaiveDate) -> bool {
        *self.checked_on.lock().await == Some(today)
    }

    pub async fn reset(&self) {
        *self.checked_on.lock().await = None;
    }
}

pub fn yesterday_of(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// Every ordered pair with distinct currencies, keyed on `date`.
pub fn required_keys(universe: &[&str], date: NaiveDate) -> Vec<RateKey> {
    universe
        .iter()
        .flat_map(|base| {
            universe
                .iter()
                .filter(move |target| *target != base)
                .map(move |target| RateKey::new(base, target, date))
        })
        .collect()
}

pub fn is_complete(entries: &RateEntries, universe: &[&str], date: NaiveDate) -> bool {
    required_keys(universe, date)
        .iter()
        .all(|key| entries.contains_key(&key.to_string()))
}

/// Writes yesterday-dated rates for every pair that has none yet. Existing
/// entries are never overwritten. A base whose table cannot be fetched is
/// skipped; the cache is saved once at the end.
pub async fn precache(
    cache: &RateCache,
    source: &dyn RateTableProvider,
    universe: &[&str],
    today: NaiveDate,
    force: bool,
    on_progress: &(dyn Fn() + Send + Sync),
) -> RateResult<PrecacheReport> {
    let date = yesterday_of(today);

    if !force && is_complete(&cache.load().await?, universe, date) {
        info!("Pre-cache for {} complete, skipping", date);
        return Ok(PrecacheReport::skipped(date));
    }

    let fetches = universe.iter().map(|base| async move {
        let table = source.latest_rates(base).await;
        on_progress();
        (*base, table)
    });

    let mut fetched_bases = Vec::new();
    let mut failed_bases = Vec::new();
    let mut tables: Vec<(&str, HashMap<String, f64>)> = Vec::new();
    for (base, table) in join_all(fetches).await {
        match table {
            RateTable::Success(rates) => {
                fetched_bases.push(base.to_string());
                tables.push((base, rates));
            }
            RateTable::InvalidBase => {
                warn!(base = %base, "Provider rejected base currency, skipping");
                failed_bases.push(base.to_string());
            }
            RateTable::TransportFailure(reason) => {
                warn!(base = %base, reason = %reason, "Rate table fetch failed, skipping");
                failed_bases.push(base.to_string());
            }
        }
    }

    let written = cache
        .update(|entries| {
            let mut written = 0;
            for (base, rates) in &tables {
                for target in universe.iter().filter(|t| *t != base) {
                    let Some(rate) = rates.get(*target).copied().filter(|r| *r > 0.0) else {
                        continue;
                    };
                    let key = RateKey::new(base, target, date).to_string();
                    if !entries.contains_key(&key) {
                        entries.insert(key, rate);
                        written += 1;
                    }
                }
            }
            written
        })
        .await?;

    info!(
        date = %date,
        fetched = fetched_bases.len(),
        failed = failed_bases.len(),
        written,
        "Pre-cache finished"
    );

    Ok(PrecacheReport {
        date,
        skipped: false,
        fetched_bases,
        failed_bases,
        written,
    })
}

/// Runs the precache check at most once per UTC day for the given state.
/// Failures are logged and swallowed; the check is retried on the next call.
/// Concurrent callers wait for the first check to finish.
pub async fn ensure_precached(
    state: &PrecacheState,
    cache: &RateCache,
    source: &dyn RateTableProvider,
    universe: &[&str],
    today: NaiveDate,
) -> Option<PrecacheReport> {
    let mut checked_on = state.checked_on.lock().await;
    if *checked_on == Some(today) {
        debug!("Pre-cache already checked for {}", today);
        return None;
    }

    match precache(cache, source, universe, today, false, &|| ()).await {
        Ok(report) => {
            *checked_on = Some(today);
            Some(report)
        }
        Err(e) => {
            warn!(error = %e, "Pre-cache check failed");
            None
        }
    }
}
