//! HTTP tests for the importer routes, run against in-memory storage and a
//! stub geocoder.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use csv_import::{Candidate, GeocodeError, Geocoder, ImportConfig, ImportPipeline};
use importer::{build_router, ServerState};
use storage::{MemoryStakeholderStore, StakeholderStore};
use test_utils::{coords, csv as fixtures, require_test_file};

struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Vec<Candidate>, GeocodeError> {
        let (latitude, longitude) = coords::LOS_ANGELES;
        Ok(vec![Candidate::new(longitude, latitude)])
    }
}

/// Geocoder that signals when a lookup begins and waits for a permit to answer.
struct GatedGeocoder {
    entered: Notify,
    gate: Semaphore,
}

#[async_trait]
impl Geocoder for GatedGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<Candidate>, GeocodeError> {
        self.entered.notify_one();
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;
        FixedGeocoder.geocode(address).await
    }
}

fn app_with_store(store: Arc<dyn StakeholderStore>) -> Router {
    let pipeline =
        ImportPipeline::new(Arc::new(FixedGeocoder), store, ImportConfig::default()).unwrap();
    build_router(Arc::new(ServerState::new(pipeline)))
}

fn app() -> Router {
    app_with_store(Arc::new(MemoryStakeholderStore::new()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_csv(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "text/csv")
        .body(body.into())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "importer");
}

#[tokio::test]
async fn test_parse_sample_upload() {
    let path = require_test_file!("sample_import.csv");
    let csv = std::fs::read(path).unwrap();

    let (status, body) = send(&app(), post_csv("/api/imports/csv/parse", csv)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aborted"], false);
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Westside Food Pantry");
    assert_eq!(rows[0]["phone"], "213-555-0101");
    assert_eq!(rows[0]["selectedCategoryIds"], json!(["1", "11"]));
    // Second row had no coordinates and was geocoded.
    assert_eq!(rows[1]["latitude"], json!(coords::LOS_ANGELES.0));
}

#[tokio::test]
async fn test_parse_rejects_malformed_csv() {
    let (status, body) = send(
        &app(),
        post_csv("/api/imports/csv/parse", "name,city\nA,Springfield,extra\n"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_parse_report_lists_failures() {
    let (status, body) = send(
        &app(),
        post_csv("/api/imports/csv/parse", fixtures::MIDDLE_ROW_UNRESOLVABLE),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aborted"], true);
    assert_eq!(body["rows"].as_array().unwrap().len(), 1);
    assert_eq!(body["failures"][0]["index"], 1);
    assert_eq!(body["failures"][0]["reason"]["kind"], "empty_address");
}

#[tokio::test]
async fn test_import_rows_and_status() {
    let store = Arc::new(MemoryStakeholderStore::new());
    let app = app_with_store(store.clone());
    let request = json!({
        "tenantId": 4,
        "action": "upsert",
        "rows": [{
            "name": "Springfield Pantry",
            "address_1": "1 Main St",
            "selectedCategoryIds": ["1", "2"],
            "latitude": 39.8,
            "longitude": -89.6
        }]
    });

    let (status, body) = send(&app, post_json("/api/imports/csv/import", &request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "stored": 1 }));
    assert_eq!(store.records().await[0].tenant_id, 4);

    let (_, status_body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(status_body["total_completed"], 1);
    assert_eq!(status_body["recent"][0]["tenant_id"], 4);
    assert_eq!(status_body["recent"][0]["action"], "upsert");
}

#[tokio::test]
async fn test_import_storage_failure_is_ok_response() {
    let app = app_with_store(Arc::new(MemoryStakeholderStore::failing("database down")));
    let request = json!({
        "tenantId": 1,
        "rows": [{ "name": "A", "selectedCategoryIds": [], "latitude": 39.8, "longitude": -89.6 }]
    });

    let (status, body) = send(&app, post_json("/api/imports/csv/import", &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert!(body["reason"].as_str().unwrap().contains("database down"));
}

#[tokio::test]
async fn test_run_parses_and_stores() {
    let store = Arc::new(MemoryStakeholderStore::new());
    let app = app_with_store(store.clone());

    let (status, body) = send(
        &app,
        post_csv("/api/imports/csv?tenantId=2", fixtures::NEEDS_GEOCODING),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "success");
    assert_eq!(body["report"]["rows"].as_array().unwrap().len(), 1);
    assert_eq!(store.records().await.len(), 1);
}

#[tokio::test]
async fn test_run_does_not_store_aborted_parse() {
    let store = Arc::new(MemoryStakeholderStore::new());
    let app = app_with_store(store.clone());

    let (status, body) = send(
        &app,
        post_csv("/api/imports/csv?tenantId=2", fixtures::MIDDLE_ROW_UNRESOLVABLE),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], Value::Null);
    assert_eq!(store.call_count().await, 0);
}

#[tokio::test]
async fn test_import_accepts_scalar_columns() {
    let store = Arc::new(MemoryStakeholderStore::new());
    let app = app_with_store(store.clone());
    let request = json!({
        "tenantId": 1,
        "rows": [{
            "name": "A",
            "phone": 5550100,
            "selectedCategoryIds": [],
            "latitude": 39.8,
            "longitude": -89.6
        }]
    });

    let (status, body) = send(&app, post_json("/api/imports/csv/import", &request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(store.records().await[0].attributes["phone"], "5550100");
}

#[tokio::test]
async fn test_run_is_tracked_while_parsing() {
    let geocoder = Arc::new(GatedGeocoder {
        entered: Notify::new(),
        gate: Semaphore::new(0),
    });
    let pipeline = ImportPipeline::new(
        geocoder.clone(),
        Arc::new(MemoryStakeholderStore::new()),
        ImportConfig::default(),
    )
    .unwrap();
    let app = build_router(Arc::new(ServerState::new(pipeline)));

    let upload = tokio::spawn({
        let app = app.clone();
        async move {
            send(
                &app,
                post_csv("/api/imports/csv?tenantId=6", fixtures::NEEDS_GEOCODING),
            )
            .await
        }
    });

    geocoder.entered.notified().await;
    let (_, status_body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(status_body["active"][0]["stage"], "parsing");
    assert_eq!(status_body["active"][0]["tenant_id"], 6);
    assert_eq!(status_body["active"][0]["rows"], 0);

    geocoder.gate.add_permits(1);
    let (status, body) = upload.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["status"], "success");

    let (_, status_body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(status_body["active"], json!([]));
    assert_eq!(status_body["recent"][0]["rows"], 1);
    assert_eq!(status_body["recent"][0]["outcome"]["status"], "success");
}

#[tokio::test]
async fn test_aborted_run_is_recorded_as_failed() {
    let app = app();

    send(
        &app,
        post_csv("/api/imports/csv?tenantId=2", fixtures::MIDDLE_ROW_UNRESOLVABLE),
    )
    .await;
    let (status, _) = send(
        &app,
        post_csv("/api/imports/csv?tenantId=2", "name,city\nA,Springfield,extra\n"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status_body) = send(&app, Request::get("/status").body(Body::empty()).unwrap()).await;
    assert_eq!(status_body["total_completed"], 2);
    assert!(status_body["active"].as_array().unwrap().is_empty());
    for recent in status_body["recent"].as_array().unwrap() {
        assert_eq!(recent["outcome"]["status"], "failed");
    }
    let reason = status_body["recent"][1]["outcome"]["reason"].as_str().unwrap();
    assert!(reason.contains("parse aborted"));
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let response = app()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
