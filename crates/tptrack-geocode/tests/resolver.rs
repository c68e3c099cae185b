//! Integration tests for the cache chain resolver: tier order, promotion,
//! and fault containment.

use tptrack_core::Coordinates;
use tptrack_geocode::{
    CoordinateResolver, GeocodeClient, GeocodeError, GeocodeMap, LocalCoordStore,
    RemoteCoordStore, SnapshotCache,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "MainSt1";

fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates { lat, lng }
}

struct Harness {
    remote_server: MockServer,
    geocode_server: MockServer,
    _dir: tempfile::TempDir,
    local: LocalCoordStore,
}

impl Harness {
    async fn new() -> Self {
        let remote_server = MockServer::start().await;
        let geocode_server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("tempdir");
        let local = LocalCoordStore::new(dir.path().join("coords.json"));
        Self {
            remote_server,
            geocode_server,
            _dir: dir,
            local,
        }
    }

    fn resolver(&self, snapshot: Option<SnapshotCache>) -> CoordinateResolver {
        let remote =
            RemoteCoordStore::new(&self.remote_server.uri(), 30).expect("remote store client");
        let geocoder = GeocodeClient::with_endpoint("test-key", 30, &self.geocode_server.uri())
            .expect("geocode client");
        CoordinateResolver::new(snapshot, self.local.clone(), remote, geocoder)
    }
}

#[tokio::test]
async fn snapshot_hit_short_circuits_all_other_tiers() {
    let harness = Harness::new().await;

    // Any HTTP request at all would fail the expectations.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(0)
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(0)
        .mount(&harness.geocode_server)
        .await;

    let mut map = GeocodeMap::new();
    map.insert(ADDRESS.to_owned(), coords(38.9, -77.03));
    let resolver = harness.resolver(Some(SnapshotCache::from_map(map)));

    let resolved = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(resolved, Some(coords(38.9, -77.03)));
    // Nothing was promoted; the hit was already in the fastest tier.
    assert_eq!(harness.local.get(ADDRESS), None);
}

#[tokio::test]
async fn remote_hit_is_promoted_to_local_storage() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(format!("/coordinates/{ADDRESS}.json")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": 38.9, "lng": -77.03})),
        )
        .expect(1)
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(0)
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);

    let first = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(first, Some(coords(38.9, -77.03)));
    assert_eq!(harness.local.get(ADDRESS), Some(coords(38.9, -77.03)));

    // Second resolution must hit tier 2, not the network (expect(1) above).
    let second = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn geocoder_hit_is_promoted_to_local_and_remote() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(format!("/coordinates/{ADDRESS}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .expect(1)
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/coordinates/{ADDRESS}.json")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("address", ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [ { "geometry": { "location": { "lat": 40.1, "lng": -75.5 } } } ]
        })))
        .expect(1)
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);

    let first = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(first, Some(coords(40.1, -75.5)));
    assert_eq!(harness.local.get(ADDRESS), Some(coords(40.1, -75.5)));

    // Promotion means the second lookup never leaves tier 2; the geocoder
    // and remote-store expectations of exactly one call verify that.
    let second = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn remote_fault_is_contained_and_chain_continues() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(format!("/coordinates/{ADDRESS}.json")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.remote_server)
        .await;
    // Write-back to the unhealthy store is attempted and also contained.
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("address", ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [ { "geometry": { "location": { "lat": 40.1, "lng": -75.5 } } } ]
        })))
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);
    let resolved = resolver.resolve(ADDRESS).await.unwrap();
    assert_eq!(resolved, Some(coords(40.1, -75.5)));
    assert_eq!(harness.local.get(ADDRESS), Some(coords(40.1, -75.5)));
}

#[tokio::test]
async fn provider_semantic_error_fails_resolution_without_promotion() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("address", ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error_message": "You have exceeded your daily request quota."
        })))
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);
    let err = resolver.resolve(ADDRESS).await.unwrap_err();
    assert!(matches!(err, GeocodeError::Api(_)), "got: {err}");
    // No coordinates were synthesized or cached anywhere.
    assert_eq!(harness.local.get(ADDRESS), None);
}

#[tokio::test]
async fn full_chain_exhaustion_is_not_found() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);
    let resolved = resolver.resolve(ADDRESS).await.unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn geocoder_transient_fault_degrades_to_not_found() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&harness.remote_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&harness.geocode_server)
        .await;

    let resolver = harness.resolver(None);
    let resolved = resolver.resolve(ADDRESS).await.unwrap();
    assert!(resolved.is_none());
}
