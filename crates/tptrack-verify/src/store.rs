//! REST client for the verification log.
//!
//! Votes live in the realtime database under
//! `stores/<sha256(address.upper())>/<TP|HS>/<auto-id>`; hashing keeps the
//! storage path opaque and uniformly shaped no matter what the raw address
//! contains. Writes POST a new record and let the database mint the id;
//! reads fetch the whole per-key log and reduce it locally.

use std::time::Duration;

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use std::collections::BTreeMap;
use tptrack_core::{address, ProductType};

use crate::error::VerifyError;
use crate::records::{active_records, VerificationRecord};

/// Client for the verification realtime database.
pub struct VerifyStore {
    client: Client,
    base_url: Url,
}

impl VerifyStore {
    /// Creates a new client for the database rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VerifyError::InvalidUrl`] if `base_url`
    /// does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, VerifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tptrack/0.1 (availability-tracking)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| VerifyError::InvalidUrl(format!("'{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the active verifications for a store address and product.
    ///
    /// Returns `None` when no log exists for the key at all; otherwise the
    /// records inside the trailing 24-hour window, most-recent first, at
    /// most one per submitter.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::Http`] on network failure or non-2xx HTTP status.
    /// - [`VerifyError::Deserialize`] if the log does not match the
    ///   expected shape.
    pub async fn read(
        &self,
        store_address: &str,
        product_type: ProductType,
    ) -> Result<Option<Vec<VerificationRecord>>, VerifyError> {
        let url = self.log_url(store_address, product_type)?;
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        // The database stores the log as an auto-id keyed object; a key
        // that was never written reads back as `null`.
        let log: Option<BTreeMap<String, VerificationRecord>> = serde_json::from_str(&body)
            .map_err(|e| VerifyError::Deserialize {
                context: format!("verifications({})", product_type.storage_key()),
                source: e,
            })?;

        Ok(log.map(|entries| {
            let total = entries.len();
            let active = active_records(entries.into_values().collect(), Utc::now());
            tracing::debug!(total, active = active.len(), "reduced verification log");
            active
        }))
    }

    /// Appends one vote for a store address and product.
    ///
    /// The record is stamped with the current time and the database mints
    /// the entry id. Storage faults propagate: a dropped vote must be
    /// visible to the submitter, not swallowed.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Http`] on network failure or non-2xx HTTP
    /// status.
    pub async fn write(
        &self,
        store_address: &str,
        product_type: ProductType,
        submitter_ip: &str,
        available: bool,
    ) -> Result<(), VerifyError> {
        let url = self.log_url(store_address, product_type)?;
        let record = VerificationRecord {
            available,
            user_ip: submitter_ip.to_owned(),
            timestamp: Utc::now(),
        };
        let response = self.client.post(url).json(&record).send().await?;
        response.error_for_status()?;
        Ok(())
    }

    fn log_url(&self, store_address: &str, product_type: ProductType) -> Result<Url, VerifyError> {
        let hashed = address::storage_hash(store_address);
        // The hash is hex, but encode defensively alongside the raw-address
        // tiers' convention.
        let encoded = utf8_percent_encode(&hashed, NON_ALPHANUMERIC);
        self.base_url
            .join(&format!(
                "stores/{encoded}/{}.json",
                product_type.storage_key()
            ))
            .map_err(|e| VerifyError::InvalidUrl(format!("address '{store_address}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_url_uses_hashed_address_and_product_segment() {
        let store = VerifyStore::new("https://verify.example.com", 30).unwrap();
        let url = store
            .log_url("1 Main St, Vienna VA", ProductType::ToiletPaper)
            .unwrap();
        let path = url.path();
        assert!(path.starts_with("/stores/"), "path: {path}");
        assert!(path.ends_with("/TP.json"), "path: {path}");
        // The raw address never leaks into the path.
        assert!(!path.contains("Main"), "path: {path}");
    }

    #[test]
    fn log_url_is_case_and_whitespace_insensitive() {
        let store = VerifyStore::new("https://verify.example.com", 30).unwrap();
        let a = store.log_url("1 Main St", ProductType::HandSanitizer).unwrap();
        let b = store
            .log_url("  1 MAIN ST ", ProductType::HandSanitizer)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn log_url_differs_by_product_type() {
        let store = VerifyStore::new("https://verify.example.com", 30).unwrap();
        let tp = store.log_url("1 Main St", ProductType::ToiletPaper).unwrap();
        let hs = store.log_url("1 Main St", ProductType::HandSanitizer).unwrap();
        assert_ne!(tp, hs);
    }
}
