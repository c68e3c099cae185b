mod feed;
mod geocode;
mod resolve;
mod snapshot;
mod verify;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tptrack-cli")]
#[command(about = "tptrack operational tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Batch geocode feed addresses missing from the snapshot file.
    Geocode,
    /// Export the shared coordinate store into the snapshot file.
    Snapshot,
    /// Resolve one address through the full cache chain.
    Resolve { address: String },
    /// Show active verification votes for a store address.
    Verify {
        address: String,
        /// Product type: tp or hs.
        #[arg(long, default_value = "tp")]
        product: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = tptrack_core::load_app_config_from_env()?;

    match Cli::parse().command {
        Commands::Geocode => geocode::run(&config).await,
        Commands::Snapshot => snapshot::run(&config).await,
        Commands::Resolve { address } => resolve::run(&config, &address).await,
        Commands::Verify { address, product } => verify::run(&config, &address, &product).await,
    }
}
