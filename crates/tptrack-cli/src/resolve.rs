//! The `resolve` command: run one address through the full cache chain.

use tptrack_core::AppConfig;
use tptrack_geocode::{
    CoordinateResolver, GeocodeClient, LocalCoordStore, RemoteCoordStore, SnapshotCache,
};

pub async fn run(config: &AppConfig, address: &str) -> anyhow::Result<()> {
    let snapshot = match SnapshotCache::load(&config.snapshot_path) {
        Ok(cache) => Some(cache),
        Err(err) => {
            tracing::warn!(error = %err, "snapshot unavailable, tier disabled");
            None
        }
    };
    let local = LocalCoordStore::new(&config.local_cache_path);
    let remote = RemoteCoordStore::new(&config.coord_db_url, config.http_timeout_secs)?;
    if config.geocode_api_key.is_none() {
        tracing::warn!("TPTRACK_GEOCODE_API_KEY unset, the provider tier will fail closed");
    }
    let geocoder = GeocodeClient::with_endpoint(
        config.geocode_api_key.as_deref().unwrap_or_default(),
        config.http_timeout_secs,
        &config.geocode_endpoint,
    )?;

    let resolver = CoordinateResolver::new(snapshot, local, remote, geocoder);

    match resolver.resolve(address).await? {
        Some(coords) => println!("{address} -> lat {}, lng {}", coords.lat, coords.lng),
        None => println!("{address} could not be resolved"),
    }

    Ok(())
}
