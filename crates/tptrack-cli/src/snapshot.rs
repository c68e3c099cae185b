//! The `snapshot` command: export the shared coordinate store into the
//! build-time snapshot file.

use tptrack_core::AppConfig;
use tptrack_geocode::{snapshot, RemoteCoordStore};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let remote = RemoteCoordStore::new(&config.coord_db_url, config.http_timeout_secs)?;

    tracing::info!("exporting shared coordinate store");
    let map = remote.export_all().await?;

    snapshot::write_map_atomic(&config.snapshot_path, &map)?;
    tracing::info!(
        entries = map.len(),
        path = %config.snapshot_path.display(),
        "snapshot written"
    );

    Ok(())
}
