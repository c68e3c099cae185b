use thiserror::Error;

/// Errors returned by the verification store client.
#[derive(Debug, Error)]
pub enum VerifyError {
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

    /// A base URL or storage path could not be combined into a request URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
