use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Inventory feed endpoint.
    pub api_url: String,
    /// Geocoding provider endpoint.
    pub geocode_endpoint: String,
    /// Credential for the geocoding provider. Optional so read-only paths
    /// (snapshot export, verification reads) work without it.
    pub geocode_api_key: Option<String>,
    /// Base URL of the shared coordinate document store.
    pub coord_db_url: String,
    /// Base URL of the verification realtime database.
    pub verify_db_url: String,
    /// Build-time snapshot file (address → coordinates).
    pub snapshot_path: PathBuf,
    /// Per-client persistent coordinate cache file.
    pub local_cache_path: PathBuf,
    /// Fixed spacing between batched geocoding calls.
    pub geocode_interval_ms: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_url", &self.api_url)
            .field("geocode_endpoint", &self.geocode_endpoint)
            .field(
                "geocode_api_key",
                &self.geocode_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("coord_db_url", &self.coord_db_url)
            .field("verify_db_url", &self.verify_db_url)
            .field("snapshot_path", &self.snapshot_path)
            .field("local_cache_path", &self.local_cache_path)
            .field("geocode_interval_ms", &self.geocode_interval_ms)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
