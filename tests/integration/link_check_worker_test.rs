// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{build_worker, fast_checker, FakeFtpConnector, InMemoryRegistry};
use linksleuth::domain::models::link_status::{LinkStatus, UrlRole, LINK_STATUS_ASPECT_ID};
use linksleuth::domain::models::record::Record;
use linksleuth::domain::services::link_check_service::NO_URLS_ERROR;
use linksleuth::utils::errors::WorkerError;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(value: Value) -> Record {
    serde_json::from_value(value).unwrap()
}

fn distribution(id: &str, strings: Value) -> Value {
    json!({
        "id": id,
        "name": id,
        "aspects": { "dcat-distribution-strings": strings }
    })
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn dataset_record_writes_one_verdict_per_distribution() {
    let server = MockServer::start().await;
    mount_status(&server, "/ok.csv", 200).await;
    mount_status(&server, "/gone.csv", 404).await;

    let dataset = record(json!({
        "id": "ds-1",
        "aspects": {
            "dataset-distributions": {
                "distributions": [
                    distribution("d-ok", json!({ "downloadURL": format!("{}/ok.csv", server.uri()) })),
                    distribution("d-gone", json!({ "accessURL": format!("{}/gone.csv", server.uri()) })),
                    distribution("d-empty", json!({})),
                ]
            }
        }
    }));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let verdicts = worker.on_record_found(&dataset).await.unwrap();

    assert_eq!(verdicts.len(), 3);
    assert_eq!(registry.write_count(), 3);

    let written = registry.written();
    assert_eq!(written["d-ok"].status, LinkStatus::Active);
    assert_eq!(written["d-ok"].http_status_code, Some(200));
    assert_eq!(written["d-gone"].status, LinkStatus::Broken);
    assert_eq!(written["d-gone"].http_status_code, Some(404));
    assert_eq!(written["d-empty"].status, LinkStatus::Broken);
    assert_eq!(written["d-empty"].error_details.as_deref(), Some(NO_URLS_ERROR));
}

#[tokio::test]
async fn working_link_wins_over_broken_one() {
    let server = MockServer::start().await;
    mount_status(&server, "/download", 500).await;
    mount_status(&server, "/access", 200).await;

    let dist = record(distribution(
        "d-1",
        json!({
            "downloadURL": format!("{}/download", server.uri()),
            "accessURL": format!("{}/access", server.uri()),
        }),
    ));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let verdicts = worker.on_record_found(&dist).await.unwrap();

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].url_role, UrlRole::AccessUrl);
    assert_eq!(registry.written()["d-1"].status, LinkStatus::Active);
}

#[tokio::test]
async fn download_url_wins_when_statuses_tie() {
    let server = MockServer::start().await;
    mount_status(&server, "/download", 200).await;
    mount_status(&server, "/access", 204).await;

    let dist = record(distribution(
        "d-1",
        json!({
            "downloadURL": format!("{}/download", server.uri()),
            "accessURL": format!("{}/access", server.uri()),
        }),
    ));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let verdicts = worker.on_record_found(&dist).await.unwrap();

    assert_eq!(verdicts[0].url_role, UrlRole::DownloadUrl);
    assert_eq!(registry.written()["d-1"].http_status_code, Some(200));
}

#[tokio::test]
async fn ftp_links_are_checked_by_listing() {
    let ftp = FakeFtpConnector::default().with_file("ftp.example.org", 21, "/pub/data.zip");
    let dataset = record(json!({
        "id": "ds-ftp",
        "aspects": {
            "dataset-distributions": {
                "distributions": [
                    distribution("found", json!({ "downloadURL": "ftp://ftp.example.org/pub/data.zip" })),
                    distribution("missing", json!({ "downloadURL": "ftp://ftp.example.org/pub/nope.zip" })),
                ]
            }
        }
    }));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), ftp);
    worker.on_record_found(&dataset).await.unwrap();

    let written = registry.written();
    assert_eq!(written["found"].status, LinkStatus::Active);
    assert_eq!(written["found"].http_status_code, None);
    assert_eq!(written["missing"].status, LinkStatus::Broken);
    assert_eq!(
        written["missing"].error_details.as_deref(),
        Some("File \"ftp://ftp.example.org/pub/nope.zip\" not found")
    );
}

#[tokio::test]
async fn unsupported_protocol_is_unknown() {
    let dist = record(distribution(
        "d-mail",
        json!({ "downloadURL": "mailto:data@example.org", "accessURL": "gopher://example.org/1" }),
    ));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    worker.on_record_found(&dist).await.unwrap();

    let aspect = &registry.written()["d-mail"];
    assert_eq!(aspect.status, LinkStatus::Unknown);
    assert_eq!(
        aspect.error_details.as_deref(),
        Some("Could not check protocol mailto")
    );
}

#[tokio::test]
async fn record_without_distributions_writes_nothing() {
    let plain = record(json!({ "id": "r-1", "aspects": { "dcat-dataset-strings": { "title": "t" } } }));

    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let verdicts = worker.on_record_found(&plain).await.unwrap();

    assert!(verdicts.is_empty());
    assert_eq!(registry.write_count(), 0);
}

#[tokio::test]
async fn registry_failure_fails_the_invocation() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dist = record(distribution(
        "d-1",
        json!({ "downloadURL": format!("{}/a", server.uri()) }),
    ));

    let registry = Arc::new(InMemoryRegistry::failing());
    let worker = build_worker(registry, &fast_checker(0), FakeFtpConnector::default());
    let result = worker.on_record_found(&dist).await;

    assert!(matches!(result, Err(WorkerError::RepositoryError(_))));
}

#[tokio::test]
async fn one_failed_write_lets_the_others_finish() {
    let dataset = record(json!({
        "id": "ds-1",
        "aspects": {
            "dataset-distributions": {
                "distributions": [
                    distribution("d-0", json!({})),
                    distribution("d-1", json!({})),
                    distribution("d-2", json!({})),
                ]
            }
        }
    }));

    let registry = Arc::new(InMemoryRegistry::failing_for("d-0"));
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    let result = worker.on_record_found(&dataset).await;

    assert!(matches!(result, Err(WorkerError::RepositoryError(_))));
    let written = registry.written();
    assert_eq!(written.len(), 2);
    assert!(written.contains_key("d-1"));
    assert!(written.contains_key("d-2"));
}

#[tokio::test]
async fn registers_link_status_aspect_definition() {
    let registry = Arc::new(InMemoryRegistry::default());
    let worker = build_worker(registry.clone(), &fast_checker(0), FakeFtpConnector::default());
    worker.register_aspect_definition().await.unwrap();

    let definitions = registry.definitions.lock().unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(definitions[0].id, LINK_STATUS_ASPECT_ID);
}
