//! Address canonicalization and opaque storage keys.
//!
//! Raw addresses are free text (spaces, punctuation, unicode), so anything
//! that keys durable storage on an address first reduces it to a uniform
//! shape: the verification log hashes the canonical form, while the
//! coordinate tiers key on the raw string directly.

use sha2::{Digest, Sha256};

/// Canonical form used for hashing: trimmed and uppercased.
#[must_use]
pub fn canonical(address: &str) -> String {
    address.trim().to_uppercase()
}

/// Opaque, uniformly-shaped storage key for an address: lowercase hex
/// SHA-256 of the canonical form.
#[must_use]
pub fn storage_hash(address: &str) -> String {
    format!("{:x}", Sha256::digest(canonical(address).as_bytes()))
}
