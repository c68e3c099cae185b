use thiserror::Error;

/// Errors produced by the geocoding client, the cache tiers, and the
/// resolver.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an embedded `error_message` payload.
    /// This is a semantic failure for the requested address, not a
    /// transient fault.
    #[error("geocoding provider error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local filesystem fault while reading or writing a cache file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A base URL or address could not be combined into a request URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
