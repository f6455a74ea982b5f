use std::fs;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fabric_deploy::application::ports::{
    ClientAuth, ClientAuthMode, WorkspaceClientFactory, WorkspaceClientSpec, WorkspaceGateway,
};
use fabric_deploy::domain::environment::WorkspaceId;
use fabric_deploy::domain::item::ItemType;
use fabric_deploy::domain::token::{BearerToken, StaticTokenCredential};
use fabric_deploy::infrastructure::adapters::FabricClientFactoryAdapter;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCOPE: &str = "https://api.fabric.microsoft.com/.default";

/// 아이템 폴더를 만들고 `.platform` 원문을 반환한다.
fn write_item(root: &Path, folder: &str, item_type: &str, name: &str) -> String {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    let platform = json!({
        "metadata": { "type": item_type, "displayName": name },
        "config": { "logicalId": format!("lid-{name}") }
    })
    .to_string();
    fs::write(dir.join(".platform"), &platform).unwrap();
    fs::write(dir.join("definition.json"), "{}").unwrap();
    platform
}

fn gateway(server: &MockServer, repo: &Path, mode: ClientAuthMode) -> Box<dyn WorkspaceGateway> {
    let token = BearerToken::expiring_in("tok", 600);
    let auth = match mode {
        ClientAuthMode::Credential => {
            ClientAuth::Credential(Arc::new(StaticTokenCredential::new(token)))
        }
        ClientAuthMode::RawToken => ClientAuth::RawToken(token.secret),
    };
    FabricClientFactoryAdapter::new(mode)
        .build(WorkspaceClientSpec {
            workspace_id: WorkspaceId::new("WS-1").unwrap(),
            repository_directory: repo.to_path_buf(),
            item_types: ItemType::ALL.to_vec(),
            auth,
            token_scope: SCOPE.to_string(),
            api_base: format!("{}/v1", server.uri()),
        })
        .expect("gateway should build")
}

async fn mount_remote_items(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/workspaces/WS-1/items"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "r1", "type": "Notebook", "displayName": "Load", "workspaceId": "WS-1" },
                { "id": "r2", "type": "Notebook", "displayName": "Stale", "workspaceId": "WS-1" },
                { "id": "r3", "type": "Lakehouse", "displayName": "Data", "workspaceId": "WS-1" }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn publish_creates_new_and_updates_existing_items() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    let platform = write_item(repo.path(), "Load.Notebook", "Notebook", "Load");
    write_item(repo.path(), "Daily.DataPipeline", "DataPipeline", "Daily");

    mount_remote_items(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/workspaces/WS-1/items"))
        .and(body_partial_json(json!({ "displayName": "Daily", "type": "DataPipeline" })))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header("Location", format!("{}/v1/operations/op-1", server.uri()).as_str())
                .insert_header("Retry-After", "0"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/operations/op-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Succeeded" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/workspaces/WS-1/items/r1/updateDefinition"))
        .and(query_param("updateMetadata", "true"))
        .and(body_partial_json(json!({
            "definition": { "parts": [
                { "path": ".platform", "payload": STANDARD.encode(&platform) },
                { "path": "definition.json", "payload": "e30=", "payloadType": "InlineBase64" }
            ] }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let published = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap();
    assert_eq!(published, 2);
}

#[tokio::test]
async fn create_payload_carries_no_metadata_part() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Fresh.Notebook", "Notebook", "Fresh");

    mount_remote_items(&server).await;

    Mock::given(method("POST"))
        .and(path("/v1/workspaces/WS-1/items"))
        .and(body_partial_json(json!({
            "displayName": "Fresh",
            "definition": { "parts": [ { "path": "definition.json" } ] }
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let published = gateway(&server, repo.path(), ClientAuthMode::RawToken)
        .publish_all_items()
        .await
        .unwrap();
    assert_eq!(published, 1);
}

async fn mount_accepted_create(server: &MockServer, location: Option<&str>) {
    let mut accepted = ResponseTemplate::new(202).insert_header("Retry-After", "0");
    if let Some(location) = location {
        let location = format!("{}{location}", server.uri());
        accepted = accepted.insert_header("Location", location.as_str());
    }
    Mock::given(method("POST"))
        .and(path("/v1/workspaces/WS-1/items"))
        .respond_with(accepted)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn failed_operation_surfaces_payload_and_deletes_nothing() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Daily.DataPipeline", "DataPipeline", "Daily");

    mount_remote_items(&server).await;
    mount_accepted_create(&server, Some("/v1/operations/op-9")).await;

    Mock::given(method("GET"))
        .and(path("/v1/operations/op-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "error": {
                "errorCode": "InvalidDefinition",
                "message": "pipeline-content.json is invalid"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("Failed"));
    assert!(rendered.contains("InvalidDefinition"));
    assert!(rendered.contains("pipeline-content.json is invalid"));
}

#[tokio::test]
async fn cancelled_operation_is_an_error() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Daily.DataPipeline", "DataPipeline", "Daily");

    mount_remote_items(&server).await;
    mount_accepted_create(&server, Some("/v1/operations/op-c")).await;

    Mock::given(method("GET"))
        .and(path("/v1/operations/op-c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Cancelled" })))
        .mount(&server)
        .await;

    let err = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Cancelled"));
}

#[tokio::test]
async fn operation_that_never_finishes_gives_up() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Daily.DataPipeline", "DataPipeline", "Daily");

    mount_remote_items(&server).await;
    mount_accepted_create(&server, Some("/v1/operations/op-slow")).await;

    Mock::given(method("GET"))
        .and(path("/v1/operations/op-slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Retry-After", "0")
                .set_body_json(json!({ "status": "Running" })),
        )
        .expect(60)
        .mount(&server)
        .await;

    let err = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("did not finish after 60 polls"));
}

#[tokio::test]
async fn accepted_without_location_is_an_error() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Daily.DataPipeline", "DataPipeline", "Daily");

    mount_remote_items(&server).await;
    mount_accepted_create(&server, None).await;

    let err = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("without a Location header"));
}

#[tokio::test]
async fn unpublish_deletes_only_scoped_orphans() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Load.Notebook", "Notebook", "Load");

    mount_remote_items(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/workspaces/WS-1/items/r2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let removed = gateway(&server, repo.path(), ClientAuthMode::RawToken)
        .unpublish_all_orphan_items()
        .await
        .unwrap();
    assert_eq!(removed, 1);
}

#[tokio::test]
async fn listing_follows_continuation_uri() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/WS-1/items"))
        .and(query_param("continuationToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [ { "id": "r9", "type": "Environment", "displayName": "Old" } ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/WS-1/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [ { "id": "r8", "type": "Notebook", "displayName": "Gone" } ],
            "continuationToken": "page-2",
            "continuationUri": format!(
                "{}/v1/workspaces/WS-1/items?continuationToken=page-2",
                server.uri()
            )
        })))
        .mount(&server)
        .await;

    for id in ["r8", "r9"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/v1/workspaces/WS-1/items/{id}")))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
    }

    let removed = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .unpublish_all_orphan_items()
        .await
        .unwrap();
    assert_eq!(removed, 2);
}

#[tokio::test]
async fn api_errors_carry_status_and_body() {
    let server = MockServer::start().await;
    let repo = tempfile::tempdir().unwrap();
    write_item(repo.path(), "Load.Notebook", "Notebook", "Load");

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/WS-1/items"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errorCode": "InsufficientPrivileges"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server, repo.path(), ClientAuthMode::Credential)
        .publish_all_items()
        .await
        .unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("403"));
    assert!(rendered.contains("InsufficientPrivileges"));
}

#[tokio::test]
async fn mismatched_auth_shape_is_rejected() {
    let repo = tempfile::tempdir().unwrap();
    let result = FabricClientFactoryAdapter::new(ClientAuthMode::Credential).build(
        WorkspaceClientSpec {
            workspace_id: WorkspaceId::new("WS-1").unwrap(),
            repository_directory: repo.path().to_path_buf(),
            item_types: ItemType::ALL.to_vec(),
            auth: ClientAuth::RawToken("tok".to_string()),
            token_scope: SCOPE.to_string(),
            api_base: "https://api.example.test/v1".to_string(),
        },
    );
    assert!(result.is_err());
}
