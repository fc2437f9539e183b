// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{build_worker, fast_checker, FakeFtpConnector, InMemoryRegistry};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use linksleuth::domain::models::link_status::LinkStatus;
use linksleuth::presentation::handlers::hook_handler::HookResponse;
use linksleuth::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(registry: Arc<InMemoryRegistry>) -> Router {
    let worker = Arc::new(build_worker(
        registry,
        &fast_checker(0),
        FakeFtpConnector::default().with_file("ftp.example.org", 21, "/a.csv"),
    ));
    routes::routes::<InMemoryRegistry>().layer(Extension(worker))
}

fn hook_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v0/hook")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ftp_distribution_payload() -> Value {
    json!({
        "action": "records",
        "lastEventId": 42,
        "records": [{
            "id": "dist-1",
            "name": "Test Record",
            "aspects": {
                "dcat-distribution-strings": { "downloadURL": "ftp://ftp.example.org/a.csv" }
            }
        }]
    })
}

#[tokio::test]
async fn hook_checks_records_and_returns_created() {
    let registry = Arc::new(InMemoryRegistry::default());
    let response = app(registry.clone())
        .oneshot(hook_request(ftp_distribution_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let summary: HookResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.distributions, 1);

    assert_eq!(registry.written()["dist-1"].status, LinkStatus::Active);
}

#[tokio::test]
async fn registry_failure_is_reported_as_server_error() {
    let response = app(Arc::new(InMemoryRegistry::failing()))
        .oneshot(hook_request(ftp_distribution_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn empty_payload_is_accepted() {
    let registry = Arc::new(InMemoryRegistry::default());
    let response = app(registry.clone())
        .oneshot(hook_request(json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(registry.write_count(), 0);
}

#[tokio::test]
async fn health_and_version_endpoints() {
    let registry = Arc::new(InMemoryRegistry::default());

    let health = app(registry.clone())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body = to_bytes(health.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");

    let version = app(registry)
        .oneshot(Request::get("/v0/version").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(version.status(), StatusCode::OK);
    let body = to_bytes(version.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], env!("CARGO_PKG_VERSION").as_bytes());
}
