//! Domain types and shared logic for the tptrack workspace: product and
//! availability vocabulary, store location records, address keys, the
//! location normalization pipeline, and application configuration.

use thiserror::Error;

pub mod address;
pub mod app_config;
pub mod availability;
pub mod config;
pub mod locations;
pub mod pipeline;

pub use app_config::{AppConfig, Environment};
pub use availability::Availability;
pub use config::{load_app_config, load_app_config_from_env};
pub use locations::{Coordinates, ProductType, RawStoreRecord, StoreLocation};
pub use pipeline::{normalize_feed, ProductPartitions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
