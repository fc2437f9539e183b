// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{build_worker, fast_checker, FakeFtpConnector, InMemoryRegistry};
use axum::http::StatusCode;
use axum::Router;
use linksleuth::domain::models::link_status::LinkStatus;
use linksleuth::domain::models::record::Record;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// 记录同时处理中的请求数
#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 启动一个对任意请求都延迟后返回 200 的服务
async fn spawn_slow_server(gauge: Arc<Gauge>) -> SocketAddr {
    let app = Router::new().fallback(move || {
        let gauge = gauge.clone();
        async move {
            gauge.enter();
            tokio::time::sleep(Duration::from_millis(150)).await;
            gauge.leave();
            StatusCode::OK
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn dataset(urls: &[String]) -> Record {
    let distributions: Vec<_> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "id": format!("d-{}", i),
                "aspects": { "dcat-distribution-strings": { "downloadURL": url } }
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": "ds-1",
        "aspects": { "dataset-distributions": { "distributions": distributions } }
    }))
    .unwrap()
}

#[tokio::test]
async fn same_host_checks_never_overlap() {
    let gauge = Arc::new(Gauge::default());
    let addr = spawn_slow_server(gauge.clone()).await;

    let urls: Vec<String> = (0..4).map(|i| format!("http://{}/file-{}", addr, i)).collect();
    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());

    worker.on_record_found(&dataset(&urls)).await.unwrap();

    assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    assert_eq!(registry.write_count(), 4);
    assert!(registry
        .written()
        .values()
        .all(|aspect| aspect.status == LinkStatus::Active));
}

#[tokio::test]
async fn different_hosts_are_checked_concurrently() {
    let gauge = Arc::new(Gauge::default());
    let first = spawn_slow_server(gauge.clone()).await;
    let second = spawn_slow_server(gauge.clone()).await;

    let urls = vec![
        format!("http://{}/a", first),
        format!("http://{}/b", second),
    ];
    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());

    worker.on_record_found(&dataset(&urls)).await.unwrap();

    assert_eq!(gauge.peak.load(Ordering::SeqCst), 2);
    assert_eq!(registry.write_count(), 2);
}

#[tokio::test]
async fn concurrent_records_never_overlap_on_one_host() {
    let gauge = Arc::new(Gauge::default());
    let addr = spawn_slow_server(gauge.clone()).await;

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let first = dataset(&[format!("http://{}/first.csv", addr)]);
    let second: Record = serde_json::from_value(json!({
        "id": "dist-second",
        "aspects": {
            "dcat-distribution-strings": { "downloadURL": format!("http://{}/second.csv", addr) }
        }
    }))
    .unwrap();

    let (left, right) = tokio::join!(
        worker.on_record_found(&first),
        worker.on_record_found(&second)
    );
    left.unwrap();
    right.unwrap();

    assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    assert_eq!(registry.write_count(), 2);
}
