use serde::{Deserialize, Serialize};

/// Stock status reported by the inventory feed, normalized to a fixed
/// vocabulary.
///
/// The feed sends free-text values like `"in stock"` or `"OUT OF STOCK"`;
/// [`Availability::parse`] maps them onto this enum. Anything unrecognized
/// becomes [`Availability::Unknown`] rather than failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    InStock,
    LimitedStockSeeStore,
    NotSoldInStore,
    OutOfStock,
    Unknown,
    Discontinued,
}

impl Availability {
    /// Parses a raw feed value: uppercased, whitespace runs collapsed to `_`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let canonical = raw
            .trim()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        match canonical.as_str() {
            "IN_STOCK" => Self::InStock,
            "LIMITED_STOCK_SEE_STORE" => Self::LimitedStockSeeStore,
            "NOT_SOLD_IN_STORE" => Self::NotSoldInStore,
            "OUT_OF_STOCK" => Self::OutOfStock,
            "DISCONTINUED" => Self::Discontinued,
            _ => Self::Unknown,
        }
    }

    /// Sort weight for list ordering. Lower weight sorts first.
    #[must_use]
    pub fn sort_weight(self) -> u8 {
        match self {
            Self::InStock => 0,
            Self::LimitedStockSeeStore => 1,
            Self::NotSoldInStore => 2,
            Self::OutOfStock => 3,
            Self::Unknown => 4,
            Self::Discontinued => 5,
        }
    }

    /// Whether the product can actually be bought here. These are the
    /// statuses shown as available and plotted on the map.
    #[must_use]
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::InStock | Self::LimitedStockSeeStore)
    }

    /// Statuses carrying no usable signal; dropped by the pipeline.
    #[must_use]
    pub fn is_invalid(self) -> bool {
        matches!(self, Self::Unknown | Self::Discontinued)
    }
}
