//! Store location records: the raw inventory feed shape and the normalized
//! form the rest of the workspace consumes.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::availability::Availability;

/// Geographic coordinates for a resolved address.
///
/// Treated as a stable fact once resolved; the same address is never
/// re-geocoded to a different location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Product tracked by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "TP")]
    ToiletPaper,
    #[serde(rename = "HS")]
    HandSanitizer,
}

impl ProductType {
    /// Short form used in storage paths (`"TP"` / `"HS"`).
    #[must_use]
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::ToiletPaper => "TP",
            Self::HandSanitizer => "HS",
        }
    }

    /// Parses feed and CLI spellings. Returns `None` for unrecognized input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "TP" | "TOILET PAPER" | "TOILET_PAPER" => Some(Self::ToiletPaper),
            "HS" | "HAND SANITIZER" | "HAND_SANITIZER" => Some(Self::HandSanitizer),
            _ => None,
        }
    }
}

/// One element of the inventory feed, exactly as fetched.
///
/// Only the fields the core consumes are modeled. `lat`/`lng` arrive as
/// either JSON numbers or numeric strings depending on the upstream source,
/// so both are accepted; values that parse to nothing become `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStoreRecord {
    pub store: String,
    pub address: String,
    pub available: String,
    #[serde(default, deserialize_with = "de_opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A normalized retail location record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreLocation {
    /// Store name with the first letter uppercased (`"walmart"` → `"Walmart"`).
    pub store: String,
    /// Free-text postal address; the natural key for coordinates and votes.
    pub address: String,
    pub available: Availability,
    pub product_type: ProductType,
    /// Coordinates already known from the feed itself, when present.
    pub known_coords: Option<Coordinates>,
    pub url: Option<String>,
    pub id: Option<String>,
}

impl StoreLocation {
    /// Canonicalizes a raw feed record: store name capitalized, availability
    /// parsed, product type defaulted to toilet paper when the feed omits it.
    #[must_use]
    pub fn from_raw(raw: RawStoreRecord) -> Self {
        let known_coords = match (raw.lat, raw.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        let product_type = raw
            .product_type
            .as_deref()
            .and_then(ProductType::parse)
            .unwrap_or(ProductType::ToiletPaper);

        Self {
            store: capitalize(&raw.store),
            address: raw.address,
            available: Availability::parse(&raw.available),
            product_type,
            known_coords,
            url: raw.url,
            id: raw.id,
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse().ok()),
        Some(other) => Err(de::Error::custom(format!(
            "expected number or string, got {other}"
        ))),
    }
}

fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}
