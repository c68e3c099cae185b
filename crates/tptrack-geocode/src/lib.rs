//! Address-to-coordinate resolution for tptrack.
//!
//! Coordinates for an address are looked up through an ordered chain of
//! increasingly expensive tiers (build-time snapshot, per-client local
//! store, shared remote store, and finally the paid geocoding provider),
//! with results from slower tiers promoted into faster ones. The batch
//! scheduler geocodes many missing addresses offline while respecting the
//! provider's rate limit.

pub mod batch;
pub mod client;
pub mod error;
pub mod local;
pub mod remote;
pub mod resolver;
pub mod snapshot;

pub use batch::{run_batch, BatchCandidate, BatchStats};
pub use client::GeocodeClient;
pub use error::GeocodeError;
pub use local::LocalCoordStore;
pub use remote::RemoteCoordStore;
pub use resolver::CoordinateResolver;
pub use snapshot::{load_map, write_map_atomic, GeocodeMap, SnapshotCache};
