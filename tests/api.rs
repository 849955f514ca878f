//! HTTP-level tests for the public API surface.

use axum_test::TestServer;
use rokto::region::RegionStore;
use rokto::server;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn test_server() -> TestServer {
    TestServer::new(server::build_router(Arc::new(RegionStore::builtin()))).unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = test_server();
    server.get("/health").await.assert_status_ok();
}

// ─── POST /resolve ───────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_coordinates_only() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .json(&json!({ "latitude": 23.8103, "longitude": 90.4125 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["divisionId"], 3);
    assert_eq!(body["districtId"], 18);
    assert_eq!(body["upazilaId"], 40);
}

#[tokio::test]
async fn test_resolve_division_hint_wins_over_geography() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .json(&json!({
            "latitude": 23.8103,
            "longitude": 90.4125,
            "address": { "state": "Sylhet" }
        }))
        .await;
    response.assert_status_ok();

    // Division comes from the hint; district and upazila still come
    // from the unconstrained nearest-neighbor scan.
    let body: Value = response.json();
    assert_eq!(body["divisionId"], 8);
    assert_eq!(body["districtId"], 18);
    assert_eq!(body["upazilaId"], 40);
}

#[tokio::test]
async fn test_resolve_district_hint_backfills_division() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .json(&json!({
            "latitude": 22.3569,
            "longitude": 91.7832,
            "address": { "district": "Cumilla" }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["divisionId"], 2);
    assert_eq!(body["districtId"], 12);
    assert_eq!(body["upazilaId"], 19);
}

#[tokio::test]
async fn test_resolve_upazila_hint_sets_full_chain() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .json(&json!({
            "latitude": 21.4300,
            "longitude": 92.0000,
            "address": { "upazila": "Savar" }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["divisionId"], 3);
    assert_eq!(body["districtId"], 18);
    assert_eq!(body["upazilaId"], 38);
}

#[tokio::test]
async fn test_resolve_accepts_boundary_coordinates() {
    let server = test_server();
    for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0)] {
        let response = server
            .post("/resolve")
            .json(&json!({ "latitude": lat, "longitude": lon }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert!(body["upazilaId"].is_number());
    }
}

#[tokio::test]
async fn test_resolve_rejects_out_of_range() {
    let server = test_server();

    let response = server
        .post("/resolve")
        .json(&json!({ "latitude": 90.5, "longitude": 90.0 }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("latitude"));

    let response = server
        .post("/resolve")
        .json(&json!({ "latitude": 23.0, "longitude": -180.001 }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("longitude"));
}

#[tokio::test]
async fn test_resolve_rejects_missing_fields() {
    let server = test_server();

    let response = server.post("/resolve").json(&json!({})).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("latitude"));

    let response = server.post("/resolve").json(&json!({ "latitude": 23.0 })).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("longitude"));

    // JSON null counts as missing.
    let response = server
        .post("/resolve")
        .json(&json!({ "latitude": null, "longitude": 90.0 }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_resolve_rejects_malformed_body() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .bytes("{\"latitude\": 23.8".into())
        .content_type("application/json")
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"], "invalid payload");
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_resolve_rejects_wrong_field_type() {
    let server = test_server();
    let response = server
        .post("/resolve")
        .json(&json!({ "latitude": "twenty-three", "longitude": 90.0 }))
        .await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"], "invalid payload");
}

// ─── Region hierarchy ────────────────────────────────────────────

#[tokio::test]
async fn test_division_list() {
    let server = test_server();
    let response = server.get("/api/divisions").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let divisions = body.as_array().unwrap();
    assert_eq!(divisions.len(), 8);
    assert_eq!(divisions[0]["name"], "Barishal");
}

#[tokio::test]
async fn test_district_list() {
    let server = test_server();
    let response = server.get("/api/divisions/3/districts").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let districts = body.as_array().unwrap();
    assert_eq!(districts.len(), 13);
    assert!(districts.iter().all(|d| d["divisionId"] == 3));
}

#[tokio::test]
async fn test_district_list_unknown_division() {
    let server = test_server();
    let response = server.get("/api/divisions/999/districts").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_upazila_list() {
    let server = test_server();
    let response = server.get("/api/districts/18/upazilas").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let upazilas = body.as_array().unwrap();
    assert_eq!(upazilas.len(), 5);
    assert_eq!(upazilas[0]["name"], "Savar");
}

#[tokio::test]
async fn test_upazila_detail_includes_ancestors() {
    let server = test_server();
    let response = server.get("/api/upazilas/38").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["upazila"]["name"], "Savar");
    assert_eq!(body["district"]["name"], "Dhaka");
    assert_eq!(body["division"]["name"], "Dhaka");
}

#[tokio::test]
async fn test_upazila_detail_unknown() {
    let server = test_server();
    server.get("/api/upazilas/99999").await.assert_status_not_found();
}

#[tokio::test]
async fn test_stats() {
    let server = test_server();
    let response = server.get("/api/stats").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["divisions"], 8);
    assert_eq!(body["districts"], 64);
    assert_eq!(body["upazilas"], 132);
    assert_eq!(body["withCoords"], 127);
}

// ─── Realtime ────────────────────────────────────────────────────

#[tokio::test]
async fn test_notify_requires_user_and_event() {
    let server = test_server();

    let response = server.post("/api/notify").json(&json!({})).await;
    response.assert_status_bad_request();

    let response = server.post("/api/notify").json(&json!({ "user": "alice" })).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("event"));
}

#[tokio::test]
async fn test_notify_without_subscribers_delivers_zero() {
    let server = test_server();
    let response = server
        .post("/api/notify")
        .json(&json!({
            "user": "alice",
            "event": "request:new",
            "data": { "requestId": 12 }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["delivered"], 0);
}

#[tokio::test]
async fn test_presence_for_offline_user() {
    let server = test_server();
    let response = server.get("/api/presence/nobody").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user"], "nobody");
    assert_eq!(body["online"], false);
    assert_eq!(body["connections"], 0);

    // Path whitespace is trimmed, as on the other user-keyed routes.
    let body: Value = server.get("/api/presence/nobody%20").await.json();
    assert_eq!(body["user"], "nobody");
}

#[tokio::test]
async fn test_subscribe_rejects_blank_user() {
    let server = test_server();
    let response = server.get("/api/subscribe/%20").await;
    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("user"));
}

#[tokio::test]
async fn test_subscribe_notify_presence_lifecycle() {
    let server = test_server();

    // The subscription request never completes on its own; it is held
    // live while the other branch runs, then dropped with the select.
    let subscribe = async {
        let _ = server.get("/api/subscribe/alice").await;
    };

    tokio::select! {
        _ = subscribe => panic!("subscription stream ended unexpectedly"),
        _ = async {
            let mut online = false;
            for _ in 0..50 {
                let body: Value = server.get("/api/presence/alice").await.json();
                if body["online"] == true {
                    online = true;
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            assert!(online, "subscriber never came online");

            // A trailing-whitespace path segment reaches the same user.
            let body: Value = server.get("/api/presence/alice%20").await.json();
            assert_eq!(body["user"], "alice");
            assert_eq!(body["online"], true);
            assert_eq!(body["connections"], 1);

            let response = server
                .post("/api/notify")
                .json(&json!({
                    "user": "alice",
                    "event": "request:new",
                    "data": { "requestId": 3 }
                }))
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["delivered"], 1);
        } => {}
    }

    // Client disconnect: the dropped request drops the stream, and the
    // registry row goes with it.
    let body: Value = server.get("/api/presence/alice").await.json();
    assert_eq!(body["online"], false);
    assert_eq!(body["connections"], 0);
}
