//! The location normalization pipeline.
//!
//! A fixed sequence of pure transforms applied to the raw feed before
//! records reach the resolver or the verification store. The order is part
//! of the contract: dedup runs after the priority sort, so for a duplicated
//! address the best-availability record is the one that survives.

use std::collections::HashSet;

use crate::availability::Availability;
use crate::locations::{ProductType, RawStoreRecord, StoreLocation};

/// Output of [`partition_by_product`]: one list per tracked product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPartitions {
    pub toilet_paper: Vec<StoreLocation>,
    pub hand_sanitizer: Vec<StoreLocation>,
}

impl ProductPartitions {
    #[must_use]
    pub fn get(&self, product_type: ProductType) -> &[StoreLocation] {
        match product_type {
            ProductType::ToiletPaper => &self.toilet_paper,
            ProductType::HandSanitizer => &self.hand_sanitizer,
        }
    }
}

/// Stage 1: canonicalize store names and the availability vocabulary.
#[must_use]
pub fn format_locations(records: Vec<RawStoreRecord>) -> Vec<StoreLocation> {
    records.into_iter().map(StoreLocation::from_raw).collect()
}

/// Stage 2: drop records carrying no usable availability signal.
#[must_use]
pub fn drop_invalid(locations: Vec<StoreLocation>) -> Vec<StoreLocation> {
    locations
        .into_iter()
        .filter(|loc| !loc.available.is_invalid())
        .collect()
}

/// Stage 3: ascending sort on availability weight.
///
/// Must stay a stable sort: ties keep their feed order, and the dedup
/// stage relies on that to pick a deterministic winner.
#[must_use]
pub fn sort_by_priority(mut locations: Vec<StoreLocation>) -> Vec<StoreLocation> {
    locations.sort_by_key(|loc| loc.available.sort_weight());
    locations
}

/// Stage 4: split into per-product lists, preserving order within each.
#[must_use]
pub fn partition_by_product(locations: Vec<StoreLocation>) -> ProductPartitions {
    let mut partitions = ProductPartitions::default();
    for loc in locations {
        match loc.product_type {
            ProductType::ToiletPaper => partitions.toilet_paper.push(loc),
            ProductType::HandSanitizer => partitions.hand_sanitizer.push(loc),
        }
    }
    partitions
}

/// Stage 5: keep the first occurrence of each address.
///
/// Running after the sort, "first" means the best-priority record for that
/// address.
#[must_use]
pub fn dedup_by_address(locations: Vec<StoreLocation>) -> Vec<StoreLocation> {
    let mut seen = HashSet::new();
    locations
        .into_iter()
        .filter(|loc| seen.insert(loc.address.clone()))
        .collect()
}

/// The full pipeline, stages in contract order.
#[must_use]
pub fn normalize_feed(records: Vec<RawStoreRecord>) -> ProductPartitions {
    let locations = sort_by_priority(drop_invalid(format_locations(records)));
    let partitions = partition_by_product(locations);
    ProductPartitions {
        toilet_paper: dedup_by_address(partitions.toilet_paper),
        hand_sanitizer: dedup_by_address(partitions.hand_sanitizer),
    }
}
