//! Client for the shared remote coordinate store (tier 3).
//!
//! A key-value document store exposed over REST: one document per raw
//! address under `/coordinates/<address>.json`, shaped `{lat, lng}`.
//! Documents are written once, by the first resolver to encounter a miss,
//! and read by every client thereafter.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use tptrack_core::Coordinates;

use crate::error::GeocodeError;
use crate::snapshot::GeocodeMap;

/// REST client for the shared coordinate document store.
pub struct RemoteCoordStore {
    client: Client,
    base_url: Url,
}

impl RemoteCoordStore {
    /// Creates a new client for the store rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tptrack/0.1 (availability-tracking)")
            .build()?;

        // Normalise: exactly one trailing slash so join() appends rather
        // than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GeocodeError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the coordinates stored for a raw address, if any.
    ///
    /// A stored `null` (never-written document) is a miss, not an error.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Deserialize`] if the document does not match
    ///   `{lat, lng}`.
    pub async fn get(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.document_url(address)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: format!("coordinates({address})"),
            source: e,
        })
    }

    /// Writes the coordinates document for a raw address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] on network failure or non-2xx HTTP
    /// status.
    pub async fn put(&self, address: &str, coords: Coordinates) -> Result<(), GeocodeError> {
        let url = self.document_url(address)?;
        let response = self.client.put(url).json(&coords).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    /// Fetches every stored coordinate document as one map.
    ///
    /// Used by the snapshot export to produce the build-time snapshot file.
    /// An empty store (stored `null`) yields an empty map.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GeocodeError::Deserialize`] if the collection does not match the
    ///   expected shape.
    pub async fn export_all(&self) -> Result<GeocodeMap, GeocodeError> {
        let url = self
            .base_url
            .join("coordinates.json")
            .map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let map: Option<GeocodeMap> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: "coordinates".to_string(),
                source: e,
            })?;
        Ok(map.unwrap_or_default())
    }

    fn document_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let encoded = utf8_percent_encode(address, NON_ALPHANUMERIC);
        self.base_url
            .join(&format!("coordinates/{encoded}.json"))
            .map_err(|e| GeocodeError::InvalidUrl(format!("address '{address}': {e}")))
    }
}
