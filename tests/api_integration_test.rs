//! REST API integration tests for the DriveLedger diagnostics API.
//!
//! The router runs against an in-memory store, so these exercise the full
//! HTTP stack without a hosted database.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use driveledger_api::server::{app, AppState};

use common::*;

// ============================================================================
// Test Helpers
// ============================================================================

async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
    let router = app(state).expect("router");
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn fixture_store() -> InMemoryStore {
    InMemoryStore::new(
        vec![
            record("1001", "rpm_spike", 0.92, "2025-06-03T08:00:00"),
            record("1001", "fuel_low", 0.45, "2025-06-02T08:00:00"),
            record("1002", "rpm_spike", 0.85, "2025-06-01T08:00:00"),
            // No NFT link for this vehicle id.
            record("9999", "coolant_overheat", 0.70, "2025-06-01T12:00:00"),
        ],
        vec![
            link("1001", VIN_A, "1001,1003"),
            link("1002", VIN_B, "1002"),
        ],
    )
}

// ============================================================================
// Probes
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(test_state(fixture_store()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "driveledger-api");
}

#[tokio::test]
async fn test_ready_with_reachable_store() {
    let (status, body) = get(test_state(fixture_store()), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Records
// ============================================================================

#[tokio::test]
async fn test_list_records_newest_first() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/records").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["unique_id"], "1001");
    assert_eq!(rows[0]["timestamp"], "2025-06-03T08:00:00");
    assert_eq!(rows[3]["timestamp"], "2025-06-01T08:00:00");
}

#[tokio::test]
async fn test_list_records_by_vehicle_and_limit() {
    let (status, body) =
        get(test_state(fixture_store()), "/api/v1/records?vehicle_id=1001&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["fault"], "rpm_spike");
}

#[tokio::test]
async fn test_list_records_search() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/records?search=fuel").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["fault"], "fuel_low");
}

#[tokio::test]
async fn test_list_records_date_range() {
    let (status, body) = get(
        test_state(fixture_store()),
        "/api/v1/records?start_date=2025-06-02&end_date=2025-06-02T23:59:59",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_records_partial_date_range_is_400() {
    let (status, body) =
        get(test_state(fixture_store()), "/api/v1/records?start_date=2025-06-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_PARAM");
}

#[tokio::test]
async fn test_latest_records_default_limit() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/records/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_latest_records_with_limit() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/records/latest?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["timestamp"], "2025-06-03T08:00:00");
}

// ============================================================================
// NFT links and detail
// ============================================================================

#[tokio::test]
async fn test_list_nft_links() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/nfts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_nft_links_filtered_by_vin() {
    let uri = format!("/api/v1/nfts?vin={VIN_B}");
    let (status, body) = get(test_state(fixture_store()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["vin"], VIN_B);
}

#[tokio::test]
async fn test_nft_detail_not_found() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/nfts/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RECORD_NOT_FOUND");
}

#[tokio::test]
async fn test_nft_detail_without_metadata_link() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/nfts/1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["unique_id"], "1001");
    assert_eq!(body["faultDisplay"], "Rpm Spike");
    assert_eq!(body["metadata"], Value::Null);
    // No link, so no resolution was attempted and no error is reported.
    assert!(body.get("metadataError").is_none());
}

#[tokio::test]
async fn test_nft_detail_degrades_when_gateways_unreachable() {
    let mut store = fixture_store();
    store.records[0].ipfs_link = Some("ipfs://QmUnreachable".to_string());

    let (status, body) = get(test_state(store), "/api/v1/nfts/1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"], Value::Null);
    assert_eq!(body["metadataError"], "metadata document unreachable");
}

#[tokio::test]
async fn test_nft_detail_resolves_metadata_via_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let gateway = axum::Router::new().route(
        "/ipfs/:cid",
        axum::routing::get(|| async {
            axum::Json(serde_json::json!({"name": "DriveLedger #1001", "image": "ipfs://QmImg"}))
        }),
    );
    tokio::spawn(async move {
        axum::serve(listener, gateway).await.unwrap();
    });

    let mut store = fixture_store();
    store.records[0].ipfs_link = Some("ipfs://QmVehicle1001".to_string());

    let state = test_state_with_gateways(store, vec![format!("http://{addr}")]);
    let (status, body) = get(state, "/api/v1/nfts/1001").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["name"], "DriveLedger #1001");
    assert!(body.get("metadataError").is_none());
}

#[tokio::test]
async fn test_nft_detail_sets_cache_control() {
    let router = app(test_state(fixture_store())).expect("router");
    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/nfts/1001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cache_control = response
        .headers()
        .get(axum::http::header::CACHE_CONTROL)
        .unwrap();
    assert_eq!(cache_control, "public, s-maxage=60, stale-while-revalidate=300");
}

#[tokio::test]
async fn test_vin_to_nft() {
    let uri = format!("/api/v1/vins/{VIN_A}/nft");
    let (status, body) = get(test_state(fixture_store()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nftId"], "1001");
}

#[tokio::test]
async fn test_vin_to_nft_unknown_vin_is_404() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/vins/NOSUCHVIN/nft").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "VIN_NOT_FOUND");
}

// ============================================================================
// Classifier
// ============================================================================

#[tokio::test]
async fn test_classifier_stats() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/classifier/stats").await;
    assert_eq!(status, StatusCode::OK);

    // Global totals include the record with no VIN link.
    assert_eq!(body["totalClassifications"], 4);
    // 2 of 4 records above the confidence threshold.
    assert_eq!(body["accuracyRate"], "50.0");

    let top = body["topFaults"].as_array().unwrap();
    assert_eq!(top[0]["fault"], "rpm_spike");
    assert_eq!(top[0]["count"], 2);
    assert_eq!(top[0]["accuracy"], 100.0);

    assert_eq!(body["recentActivity"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_classifier_stats_accuracy_example() {
    // Two engine_misfire records, one above and one below the threshold.
    let store = InMemoryStore::new(
        vec![
            record("1001", "engine_misfire", 0.9, "2025-06-01T08:00:00"),
            record("1001", "engine_misfire", 0.5, "2025-06-01T09:00:00"),
        ],
        vec![link("1001", VIN_A, "1001")],
    );

    let (status, body) = get(test_state(store), "/api/v1/classifier/stats").await;
    assert_eq!(status, StatusCode::OK);
    let top = &body["topFaults"][0];
    assert_eq!(top["fault"], "engine_misfire");
    assert_eq!(top["count"], 2);
    assert_eq!(top["accuracy"], 50.0);
}

#[tokio::test]
async fn test_classifier_history_drops_unresolved() {
    let (status, body) =
        get(test_state(fixture_store()), "/api/v1/classifier/history?time_range=all").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // The 9999 record has no VIN link.
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert!(row["vin"] == VIN_A || row["vin"] == VIN_B);
        assert_eq!(row["actualFault"], Value::Null);
    }
}

#[tokio::test]
async fn test_classifier_history_rejects_unknown_range() {
    let (status, body) =
        get(test_state(fixture_store()), "/api/v1/classifier/history?time_range=1y").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PARAM");
}

// ============================================================================
// Fleet
// ============================================================================

#[tokio::test]
async fn test_fleet_stats() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/fleet/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalVehicles"], 2);
    assert_eq!(body["mostCommonFault"]["fault"], "rpm_spike");
    assert_eq!(body["mostCommonFault"]["percentage"], "50.0");
}

#[tokio::test]
async fn test_fleet_overview_rollups() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/fleet/overview").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let vehicle_a = rows.iter().find(|r| r["vin"] == VIN_A).unwrap();
    assert_eq!(vehicle_a["faultCount"], 2);
    assert_eq!(vehicle_a["lastFault"]["fault"], "rpm_spike");
    assert_eq!(vehicle_a["lastFault"]["timestamp"], "2025-06-03T08:00:00");
}

#[tokio::test]
async fn test_fleet_overview_empty_without_links() {
    let store = InMemoryStore::new(
        vec![record("1001", "rpm_spike", 0.9, "2025-06-01T08:00:00")],
        vec![],
    );
    let (status, body) = get(test_state(store), "/api/v1/fleet/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_fleet_analytics() {
    let (status, body) = get(test_state(fixture_store()), "/api/v1/fleet/analytics").await;
    assert_eq!(status, StatusCode::OK);

    let trend = body["trend"].as_array().unwrap();
    assert_eq!(trend[0]["day"], "2025-06-01");
    assert_eq!(trend[0]["count"], 2);

    // Every fixture record carries the same three channels.
    assert_eq!(body["sensorAverages"]["engine_load"], 45.0);
    // Channels with no observations average exactly zero.
    assert_eq!(body["sensorAverages"]["fuel_rate"], 0.0);

    let vehicles = body["vehicles"].as_array().unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0]["total"], 0);
}
