use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = require("TPTRACK_API_URL")?;
    let coord_db_url = require("TPTRACK_COORD_DB_URL")?;
    let verify_db_url = require("TPTRACK_VERIFY_DB_URL")?;

    let env = parse_environment(&or_default("TPTRACK_ENV", "development"));
    let log_level = or_default("TPTRACK_LOG_LEVEL", "info");

    let geocode_endpoint = or_default(
        "TPTRACK_GEOCODE_ENDPOINT",
        "https://maps.googleapis.com/maps/api/geocode/json",
    );
    let geocode_api_key = lookup("TPTRACK_GEOCODE_API_KEY").ok();

    let snapshot_path = PathBuf::from(or_default("TPTRACK_SNAPSHOT_PATH", "./data/geocodes.json"));
    let local_cache_path = PathBuf::from(or_default(
        "TPTRACK_LOCAL_CACHE_PATH",
        "./data/local-coords.json",
    ));

    let geocode_interval_ms = parse_u64("TPTRACK_GEOCODE_INTERVAL_MS", "200")?;
    let http_timeout_secs = parse_u64("TPTRACK_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TPTRACK_USER_AGENT", "tptrack/0.1 (availability-tracking)");

    Ok(AppConfig {
        env,
        log_level,
        api_url,
        geocode_endpoint,
        geocode_api_key,
        coord_db_url,
        verify_db_url,
        snapshot_path,
        local_cache_path,
        geocode_interval_ms,
        http_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
