//! Client for the inventory feed.
//!
//! One GET returning the full location list. Feed failures are not retried
//! here; a failed fetch fails the current run and is surfaced to the
//! caller.

use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;
use tptrack_core::RawStoreRecord;

/// Errors returned by the inventory feed client.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The feed URL does not parse.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

pub struct FeedClient {
    client: Client,
    url: Url,
}

impl FeedClient {
    /// Creates a client for the feed at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FeedError::InvalidUrl`] if `url` does
    /// not parse.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let url = Url::parse(url).map_err(|e| FeedError::InvalidUrl(format!("'{url}': {e}")))?;
        Ok(Self { client, url })
    }

    /// Fetches the full location list.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] on network failure or non-2xx HTTP status.
    /// - [`FeedError::Deserialize`] if the body is not a JSON array of
    ///   location records.
    pub async fn fetch_locations(&self) -> Result<Vec<RawStoreRecord>, FeedError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FeedError::Deserialize {
            context: self.url.to_string(),
            source: e,
        })
    }
}
