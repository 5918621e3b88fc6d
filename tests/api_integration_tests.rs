//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use namespaced_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::from_config(&Config::default()).unwrap())
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn put(app: &Router, namespace: &str, key: &str, value: &str) {
    let body = format!(r#"{{"value":"{}"}}"#, value);
    let (status, json) = send(app, "PUT", &format!("/cache/{}/{}", namespace, key), Some(&body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);
}

// == PUT / GET Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app();

    let (status, json) = send(&app, "PUT", "/cache/the/hi", Some(r#"{"value":"2"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stored"], true);
    assert!(json["message"].as_str().unwrap().contains("hi"));
}

#[tokio::test]
async fn test_put_endpoint_with_expiry() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/cache/the/hi",
        Some(r#"{"value":"2","expiry":60}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();
    put(&app, "the", "hi", "2").await;

    let (status, json) = send(&app, "GET", "/cache/the/hi", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["namespace"], "the");
    assert_eq!(json["key"], "hi");
    assert_eq!(json["value"], "2");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/cache/the/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("the/missing"));
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache/the/hi")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

// == Invalidation Tests ==

#[tokio::test]
async fn test_invalidate_scenario() {
    let app = create_test_app();
    put(&app, "a", "hi", "1").await;
    put(&app, "the", "hi", "2").await;
    put(&app, "the", "ho", "10").await;

    let (status, json) = send(&app, "POST", "/namespaces/the/invalidate", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["namespace"], "the");
    assert!(json["generation"].as_u64().is_some());

    let (status, json) = send(&app, "GET", "/cache/a/hi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], "1");

    let (status, _) = send(&app, "GET", "/cache/the/hi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/cache/the/ho", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalidate_advances_generation() {
    let app = create_test_app();

    let (_, first) = send(&app, "POST", "/namespaces/ns/invalidate", None).await;
    let (_, second) = send(&app, "POST", "/namespaces/ns/invalidate", None).await;

    assert_eq!(
        second["generation"].as_u64().unwrap(),
        first["generation"].as_u64().unwrap() + 1
    );
}

// == Bulk Endpoint Tests ==

#[tokio::test]
async fn test_bulk_get_endpoint() {
    let app = create_test_app();
    put(&app, "the", "hi", "2").await;
    put(&app, "the", "ho", "10").await;

    let body = r#"{"keys":[
        {"namespace":"the","key":"hi"},
        {"namespace":"the","key":"ho"},
        {"namespace":"the","key":"missing"}
    ]}"#;
    let (status, json) = send(&app, "POST", "/cache/bulk", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let hits = json["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["value"], "2");
    assert_eq!(hits[1]["value"], "10");
    assert_eq!(json["misses"], 1);
}

#[tokio::test]
async fn test_bulk_get_duplicate_keys_count_once() {
    let app = create_test_app();
    put(&app, "the", "hi", "2").await;

    let body = r#"{"keys":[
        {"namespace":"the","key":"hi"},
        {"namespace":"the","key":"hi"},
        {"namespace":"the","key":"missing"},
        {"namespace":"the","key":"missing"}
    ]}"#;
    let (status, json) = send(&app, "POST", "/cache/bulk", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let hits = json["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["value"], "2");
    assert_eq!(json["misses"], 1);
}

#[tokio::test]
async fn test_bulk_get_empty_namespace_rejected() {
    let app = create_test_app();

    let body = r#"{"keys":[{"namespace":"","key":"hi"}]}"#;
    let (status, json) = send(&app, "POST", "/cache/bulk", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("namespace"));
}

// == Stats / Health Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();
    put(&app, "the", "hi", "2").await;
    send(&app, "GET", "/cache/the/hi", None).await;
    send(&app, "GET", "/cache/the/missing", None).await;

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cache"]["hits"], 1);
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["cache"]["puts"], 1);
    assert_eq!(json["store"]["total_entries"], 1);
    assert_eq!(json["namespaces"], 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
