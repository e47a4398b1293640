// API integration tests that verify HTTP endpoints
// Tests the actual Axum router against an in-memory composite matrix

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt; // For `.collect()`
use rain_hazard_service::api::{create_router, generate_openapi_spec, AppState};
use rain_hazard_service::services::{HazardService, RiskService};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`

fn test_app() -> Router {
    create_router(AppState {
        hazard_service: HazardService::new(Arc::new(common::sample_matrix())),
        risk_service: RiskService::default(),
    })
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_risk(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/risk")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cells"], 4);
    assert!(body["loaded_at"].is_string());
}

#[tokio::test]
async fn test_hazards_snaps_to_nearest_cell() {
    let (status, body) = send(get("/api/v1/hazards?lat=18.52&lon=73.6")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["LAT"], json!(18.5));
    assert_eq!(body["LON"], json!(73.5));
    assert_eq!(body["Composite_Hazard"], json!(0.3456));
    assert_eq!(body["RP_Avg"], json!(190.04));
    assert!(body.get("P_D4").is_some());
}

#[tokio::test]
async fn test_hazards_no_data() {
    let (status, body) = send(get("/api/v1/hazards?lat=28.6&lon=77.2")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No preprocessed data"));
}

#[tokio::test]
async fn test_hazards_invalid_coordinate() {
    let (status, body) = send(get("/api/v1/hazards?lat=95.0&lon=73.5")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid coordinate"));
}

#[tokio::test]
async fn test_hazards_missing_parameter() {
    let (status, _) = send(get("/api/v1/hazards?lat=18.5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_risk_response_shape() {
    let (status, body) = send(post_risk(json!({
        "latitude": 18.52,
        "longitude": 73.6,
        "sector": "Automotive"
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], json!({"lat": 18.5, "lon": 73.5}));
    assert_eq!(body["sector"], "Automotive");
    assert_eq!(body["hazards"]["Composite_Hazard"], json!(0.3456));
    assert_eq!(
        body["risk_result"],
        json!({
            "Final_Score": 0.1728,
            "Category": "Low",
            "Weight": 0.5,
            "Composite_Hazard": 0.3456
        })
    );
}

#[tokio::test]
async fn test_risk_default_sector() {
    let (status, body) = send(post_risk(json!({"latitude": 18.5, "longitude": 74.0}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sector"], "Other");
    assert_eq!(body["risk_result"]["Weight"], json!(0.5));
    assert_eq!(body["risk_result"]["Final_Score"], json!(0.05));
}

#[tokio::test]
async fn test_risk_high_category() {
    let (status, body) = send(post_risk(json!({
        "latitude": 13.1,
        "longitude": 80.4,
        "sector": "chemical"
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_result"]["Weight"], json!(1.0));
    assert_eq!(body["risk_result"]["Final_Score"], json!(0.6));
    assert_eq!(body["risk_result"]["Category"], "High");
}

#[tokio::test]
async fn test_risk_negative_longitude_wraps() {
    // Stored at 286.0 in 0-360 longitude
    let (status, body) = send(post_risk(json!({
        "latitude": 40.7,
        "longitude": -74.0,
        "sector": "Pharma"
    })))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], json!({"lat": 40.5, "lon": 286.0}));
    assert_eq!(body["risk_result"]["Final_Score"], json!(0.25));
    assert_eq!(body["risk_result"]["Category"], "Medium");
}

#[tokio::test]
async fn test_risk_invalid_longitude() {
    let (status, _) = send(post_risk(json!({"latitude": 13.0, "longitude": -279.5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_risk_no_data() {
    let (status, body) = send(post_risk(json!({
        "latitude": 28.6,
        "longitude": 77.2,
        "sector": "ICT"
    })))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_risk_malformed_body() {
    let (status, _) = send(post_risk(json!({"latitude": "north"}))).await;
    assert!(status.is_client_error());
}

#[test]
fn test_openapi_lists_routes() {
    let spec = generate_openapi_spec();
    for path in ["/api/v1/health", "/api/v1/hazards", "/api/v1/risk"] {
        assert!(spec.paths.paths.contains_key(path), "missing {path}");
    }
}
