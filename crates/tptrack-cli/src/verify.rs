//! The `verify` command: show the active votes for a store address.

use tptrack_core::{AppConfig, ProductType};
use tptrack_verify::{VerifyStore, VoteSummary};

pub async fn run(config: &AppConfig, address: &str, product: &str) -> anyhow::Result<()> {
    let product_type = ProductType::parse(product).ok_or_else(|| {
        anyhow::anyhow!("unrecognized product type '{product}' (expected tp or hs)")
    })?;

    let store = VerifyStore::new(&config.verify_db_url, config.http_timeout_secs)?;

    match store.read(address, product_type).await? {
        None => println!("no verifications recorded for {address}"),
        Some(records) => {
            let summary = VoteSummary::from_active(&records);
            println!(
                "{address} ({}): {} available / {} unavailable",
                product_type.storage_key(),
                summary.upvotes,
                summary.downvotes
            );
            if let Some(ts) = summary.last_upvote_at {
                println!("  last verified available: {ts}");
            }
            if let Some(ts) = summary.last_downvote_at {
                println!("  last disputed: {ts}");
            }
        }
    }

    Ok(())
}
