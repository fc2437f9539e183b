// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use linksleuth::domain::models::aspect_definition::AspectDefinition;
use linksleuth::domain::models::link_status::LinkAspect;
use linksleuth::domain::repositories::registry_repository::RegistryRepository;
use linksleuth::infrastructure::registry::registry_client::RegistryClient;
use linksleuth::utils::errors::RepositoryError;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RegistryClient {
    RegistryClient::new(
        &format!("{}/v0/", server.uri()),
        "test-secret".to_string(),
        "test-user".to_string(),
        7,
    )
    .unwrap()
}

#[tokio::test]
async fn link_aspect_is_merged_with_session_and_tenant_headers() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v0/records/dist-1/aspects/source-link-status"))
        .and(query_param("merge", "true"))
        .and(header_exists("x-magda-session"))
        .and(header("x-magda-tenant-id", "7"))
        .and(body_json(json!({ "status": "broken", "httpStatusCode": 404, "errorDetails": "HTTP 404: Not Found" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .put_link_aspect(
            "dist-1",
            &LinkAspect::broken(Some(404), "HTTP 404: Not Found"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .put_link_aspect("dist-1", &LinkAspect::active(Some(200)))
        .await
        .unwrap_err();

    match err {
        RepositoryError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn aspect_definition_is_put_by_id() {
    let server = MockServer::start().await;
    let definition = AspectDefinition::source_link_status();
    Mock::given(method("PUT"))
        .and(path("/v0/aspects/source-link-status"))
        .and(header("x-magda-tenant-id", "7"))
        .and(body_json(serde_json::to_value(&definition).unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).put_aspect_definition(&definition).await.unwrap();
}
