//! The `geocode` command: batch geocode feed addresses missing from the
//! snapshot file.

use std::time::Duration;

use tptrack_core::{pipeline, AppConfig};
use tptrack_geocode::{run_batch, snapshot, BatchCandidate, GeocodeClient};

use crate::feed::FeedClient;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let api_key = config.geocode_api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!("TPTRACK_GEOCODE_API_KEY must be set for batch geocoding")
    })?;

    let feed = FeedClient::new(&config.api_url, config.http_timeout_secs, &config.user_agent)?;
    let records = feed.fetch_locations().await?;
    tracing::info!(records = records.len(), "fetched inventory feed");

    let partitions = pipeline::normalize_feed(records);
    let candidates: Vec<BatchCandidate> = partitions
        .toilet_paper
        .iter()
        .chain(partitions.hand_sanitizer.iter())
        .map(BatchCandidate::from)
        .collect();

    let geocodes = snapshot::load_map(&config.snapshot_path)?;
    tracing::info!(
        existing = geocodes.len(),
        candidates = candidates.len(),
        "checking feed addresses against persisted geocodes"
    );

    let client =
        GeocodeClient::with_endpoint(api_key, config.http_timeout_secs, &config.geocode_endpoint)?;
    let (merged, stats) = run_batch(
        &client,
        geocodes,
        candidates,
        Duration::from_millis(config.geocode_interval_ms),
    )
    .await;

    if stats.has_new_entries() {
        snapshot::write_map_atomic(&config.snapshot_path, &merged)?;
        tracing::info!(
            carried = stats.carried,
            resolved = stats.resolved,
            failed = stats.failed,
            total = merged.len(),
            path = %config.snapshot_path.display(),
            "snapshot updated"
        );
    } else {
        tracing::info!(
            skipped = stats.skipped,
            failed = stats.failed,
            "no new addresses, snapshot left untouched"
        );
    }

    Ok(())
}
