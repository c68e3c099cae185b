//! HTTP client for the external geocoding provider.
//!
//! Wraps `reqwest` with provider-specific error handling, credential
//! management, and typed response deserialization. An `error_message` field
//! in the response body is surfaced as [`GeocodeError::Api`]; an empty
//! result set is a plain miss, never an error.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tptrack_core::Coordinates;

use crate::error::GeocodeError;

const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Client for the geocoding provider's REST API.
///
/// Use [`GeocodeClient::new`] for production or
/// [`GeocodeClient::with_endpoint`] to point at a mock server in tests.
pub struct GeocodeClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

impl GeocodeClient {
    /// Creates a new client pointed at the production geocoding endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_endpoint(api_key, timeout_secs, DEFAULT_ENDPOINT)
    }

    /// Creates a new client with a custom endpoint (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidUrl`] if `endpoint`
    /// is not a valid URL.
    pub fn with_endpoint(
        api_key: &str,
        timeout_secs: u64,
        endpoint: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tptrack/0.1 (availability-tracking)")
            .build()?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| GeocodeError::InvalidUrl(format!("'{endpoint}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Geocodes a single address.
    ///
    /// Returns `Ok(None)` when the provider has no result for the address.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Api`] if the provider embeds an `error_message`.
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.build_url(address);
        let body = self.request_json(&url).await?;

        if let Some(msg) = body.get("error_message").and_then(serde_json::Value::as_str) {
            return Err(GeocodeError::Api(msg.to_string()));
        }

        let response: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| GeocodeError::Deserialize {
                context: format!("geocode(address={address})"),
                source: e,
            })?;

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location))
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters.
    fn build_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("address", address);
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] on network failure or a non-2xx status.
    /// Returns [`GeocodeError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}
