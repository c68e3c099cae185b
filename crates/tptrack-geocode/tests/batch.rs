//! Integration tests for the batch geocoder: set difference, feed
//! carry-through, per-address failure isolation, and rate pacing.

use std::time::{Duration, Instant};

use tptrack_core::Coordinates;
use tptrack_geocode::{run_batch, BatchCandidate, GeocodeClient, GeocodeMap};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coords(lat: f64, lng: f64) -> Coordinates {
    Coordinates { lat, lng }
}

fn candidate(address: &str, known: Option<Coordinates>) -> BatchCandidate {
    BatchCandidate {
        address: address.to_owned(),
        known,
    }
}

fn test_client(endpoint: &str) -> GeocodeClient {
    GeocodeClient::with_endpoint("test-key", 30, endpoint)
        .expect("client construction should not fail")
}

fn geocode_body(lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [ { "geometry": { "location": { "lat": lat, "lng": lng } } } ]
    })
}

#[tokio::test]
async fn batch_merges_known_skips_present_and_geocodes_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("address", "3 Elm St"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(41.0, -74.0)))
        .expect(1)
        .mount(&server)
        .await;

    let mut existing = GeocodeMap::new();
    existing.insert("1 Main St".to_owned(), coords(38.9, -77.03));

    let candidates = vec![
        candidate("1 Main St", None),                        // already persisted
        candidate("2 Oak Ave", Some(coords(39.0, -76.9))),   // feed knows it
        candidate("3 Elm St", None),                         // provider call
        candidate("3 Elm St", None),                         // duplicate, collapsed
    ];

    let client = test_client(&server.uri());
    let (merged, stats) = run_batch(&client, existing, candidates, Duration::ZERO).await;

    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get("1 Main St"), Some(&coords(38.9, -77.03)));
    assert_eq!(merged.get("2 Oak Ave"), Some(&coords(39.0, -76.9)));
    assert_eq!(merged.get("3 Elm St"), Some(&coords(41.0, -74.0)));

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.carried, 1);
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.failed, 0);
    assert!(stats.has_new_entries());
}

#[tokio::test]
async fn one_failing_address_never_aborts_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("address", "bad address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error_message": "Invalid request."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("address", "4 Pine Rd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(42.5, -71.1)))
        .mount(&server)
        .await;

    let candidates = vec![candidate("bad address", None), candidate("4 Pine Rd", None)];

    let client = test_client(&server.uri());
    let (merged, stats) =
        run_batch(&client, GeocodeMap::new(), candidates, Duration::ZERO).await;

    assert!(!merged.contains_key("bad address"));
    assert_eq!(merged.get("4 Pine Rd"), Some(&coords(42.5, -71.1)));
    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn empty_provider_result_counts_as_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let (merged, stats) = run_batch(
        &client,
        GeocodeMap::new(),
        vec![candidate("5 Birch Ln", None)],
        Duration::ZERO,
    )
    .await;

    assert!(merged.is_empty());
    assert_eq!(stats.failed, 1);
    assert!(!stats.has_new_entries());
}

#[tokio::test]
async fn calls_are_spaced_by_the_configured_interval() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(40.0, -75.0)))
        .expect(3)
        .mount(&server)
        .await;

    let candidates = vec![
        candidate("1 A St", None),
        candidate("2 B St", None),
        candidate("3 C St", None),
    ];

    let interval = Duration::from_millis(40);
    let client = test_client(&server.uri());

    let started = Instant::now();
    let (merged, stats) = run_batch(&client, GeocodeMap::new(), candidates, interval).await;
    let elapsed = started.elapsed();

    assert_eq!(merged.len(), 3);
    assert_eq!(stats.resolved, 3);
    // The third call is scheduled no earlier than 2 × interval after the
    // first, so the whole batch cannot settle before that offset.
    assert!(
        elapsed >= interval * 2,
        "batch settled too fast: {elapsed:?}"
    );
}

#[tokio::test]
async fn all_known_candidates_touch_the_provider_zero_times() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_body(0.0, 0.0)))
        .expect(0)
        .mount(&server)
        .await;

    let candidates = vec![
        candidate("1 Main St", Some(coords(38.9, -77.03))),
        candidate("2 Oak Ave", Some(coords(39.0, -76.9))),
    ];

    let client = test_client(&server.uri());
    let (merged, stats) =
        run_batch(&client, GeocodeMap::new(), candidates, Duration::ZERO).await;

    assert_eq!(merged.len(), 2);
    assert_eq!(stats.carried, 2);
    assert_eq!(stats.resolved, 0);
}
