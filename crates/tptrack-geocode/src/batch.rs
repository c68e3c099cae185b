//! The offline batch geocoder.
//!
//! Given the candidate addresses from a feed run and the already-persisted
//! geocode map, schedules one provider call per genuinely missing address.
//! The provider rate-limits aggressively, so calls are never bursted: the
//! i-th call is delayed by `interval * i` from batch start. The batch is
//! complete only when every scheduled call has settled; the caller then
//! persists the merged map in a single atomic write, so a crash mid-batch
//! loses this run's gains and nothing else.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::join_all;
use tptrack_core::{Coordinates, StoreLocation};

use crate::client::GeocodeClient;
use crate::snapshot::GeocodeMap;

/// One address to consider for geocoding, with any coordinates the feed
/// itself already supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCandidate {
    pub address: String,
    pub known: Option<Coordinates>,
}

impl From<&StoreLocation> for BatchCandidate {
    fn from(loc: &StoreLocation) -> Self {
        Self {
            address: loc.address.clone(),
            known: loc.known_coords,
        }
    }
}

/// Outcome counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Already present in the persisted map; no work done.
    pub skipped: usize,
    /// Coordinates carried over from the feed without a provider call.
    pub carried: usize,
    /// Resolved through the provider this run.
    pub resolved: usize,
    /// Provider failures or empty results; omitted and retried next run.
    pub failed: usize,
}

impl BatchStats {
    /// Whether this run added anything the caller should persist.
    #[must_use]
    pub fn has_new_entries(self) -> bool {
        self.carried + self.resolved > 0
    }
}

/// Delay offset for the i-th provider call in a batch.
#[must_use]
pub fn stagger_delay(interval: Duration, index: usize) -> Duration {
    interval.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Runs one batch: merges feed-known coordinates directly, geocodes the
/// rest at a fixed pace, and returns the merged map with run stats.
///
/// A provider failure for one address never aborts the batch: the address
/// is logged, omitted from this run's updates, and picked up again on the
/// next run. Nothing is persisted here; the caller owns the single atomic
/// flush.
pub async fn run_batch(
    client: &GeocodeClient,
    mut geocodes: GeocodeMap,
    candidates: Vec<BatchCandidate>,
    interval: Duration,
) -> (GeocodeMap, BatchStats) {
    let mut stats = BatchStats::default();
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    for candidate in candidates {
        if !seen.insert(candidate.address.clone()) {
            continue;
        }
        if geocodes.contains_key(&candidate.address) {
            stats.skipped += 1;
            continue;
        }
        // The feed already knows where this store is; no call slot needed.
        if let Some(coords) = candidate.known {
            geocodes.insert(candidate.address, coords);
            stats.carried += 1;
            continue;
        }
        pending.push(candidate.address);
    }

    if pending.is_empty() {
        return (geocodes, stats);
    }
    tracing::info!(count = pending.len(), "geocoding missing addresses");

    let calls = pending.into_iter().enumerate().map(|(index, address)| {
        let delay = stagger_delay(interval, index);
        async move {
            tokio::time::sleep(delay).await;
            tracing::debug!(%address, "geocoding address");
            let result = client.geocode(&address).await;
            (address, result)
        }
    });

    for (address, result) in join_all(calls).await {
        match result {
            Ok(Some(coords)) => {
                geocodes.insert(address, coords);
                stats.resolved += 1;
            }
            Ok(None) => {
                tracing::warn!(%address, "provider returned no result, skipping");
                stats.failed += 1;
            }
            Err(err) => {
                tracing::warn!(%address, error = %err, "geocoding failed, skipping");
                stats.failed += 1;
            }
        }
    }

    (geocodes, stats)
}
