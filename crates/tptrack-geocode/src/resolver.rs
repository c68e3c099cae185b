//! The coordinate cache chain resolver.
//!
//! Resolution walks a strict tier order, cheapest first, and stops at the
//! first hit:
//!
//! 1. build-time snapshot (in-memory, no I/O)
//! 2. per-client local store (local I/O)
//! 3. shared remote coordinate store (network)
//! 4. external geocoding provider (network, paid, rate-limited)
//!
//! A hit at tier 3 or 4 is promoted into every faster writable tier before
//! it is returned (tier 2 always, tier 3 additionally on a tier-4 hit), so
//! repeated lookups of the same address converge to tier 1/2 hits.
//! Transient faults at tiers 3 and 4 are logged and treated as a miss for
//! that tier only; a semantic provider error fails resolution for the
//! address.

use tptrack_core::Coordinates;

use crate::client::GeocodeClient;
use crate::error::GeocodeError;
use crate::local::LocalCoordStore;
use crate::remote::RemoteCoordStore;
use crate::snapshot::SnapshotCache;

/// Resolves postal addresses to coordinates through the tiered cache chain.
pub struct CoordinateResolver {
    snapshot: Option<SnapshotCache>,
    local: LocalCoordStore,
    remote: RemoteCoordStore,
    geocoder: GeocodeClient,
}

impl CoordinateResolver {
    /// Builds a resolver over the four tiers. Pass `None` for `snapshot`
    /// when no build-time snapshot is available; that tier then always
    /// misses.
    #[must_use]
    pub fn new(
        snapshot: Option<SnapshotCache>,
        local: LocalCoordStore,
        remote: RemoteCoordStore,
        geocoder: GeocodeClient,
    ) -> Self {
        Self {
            snapshot,
            local,
            remote,
            geocoder,
        }
    }

    /// Resolves one address.
    ///
    /// Returns `Ok(None)` when every tier missed; the location simply has
    /// no plottable coordinates this session.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Api`] when the provider reports a semantic
    /// error for this address. Transient faults never surface here.
    pub async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        if let Some(snapshot) = &self.snapshot {
            if let Some(coords) = snapshot.lookup(address) {
                return Ok(Some(coords));
            }
        }

        if let Some(coords) = self.local.get(address) {
            return Ok(Some(coords));
        }

        match self.remote.get(address).await {
            Ok(Some(coords)) => {
                self.promote_local(address, coords);
                return Ok(Some(coords));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(address, error = %err, "coordinate store lookup failed, falling through to geocoder");
            }
        }

        match self.geocoder.geocode(address).await {
            Ok(Some(coords)) => {
                self.promote_local(address, coords);
                if let Err(err) = self.remote.put(address, coords).await {
                    tracing::warn!(address, error = %err, "coordinate store write-back failed");
                }
                Ok(Some(coords))
            }
            Ok(None) => Ok(None),
            Err(err @ GeocodeError::Api(_)) => Err(err),
            Err(err) => {
                tracing::warn!(address, error = %err, "geocoder call failed, address left unresolved");
                Ok(None)
            }
        }
    }

    fn promote_local(&self, address: &str, coords: Coordinates) {
        if let Err(err) = self.local.put(address, coords) {
            tracing::warn!(address, error = %err, "local coordinate store write-back failed");
        }
    }
}
