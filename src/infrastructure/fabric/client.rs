//! Fabric REST API 연동 구현.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::{LOCATION, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::repository::scan_repository;
use crate::application::ports::ClientAuth;
use crate::domain::environment::WorkspaceId;
use crate::domain::item::{DefinitionPart, ItemType, RemoteItem, RepositoryItem};
use crate::domain::policy::{PublishAction, find_orphans, plan_publish};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLLS: usize = 60;

pub struct FabricRestClient {
    client: Client,
    api_base: String,
    workspace_id: WorkspaceId,
    repository_directory: PathBuf,
    item_types: Vec<ItemType>,
    auth: ClientAuth,
    token_scope: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsPage {
    #[serde(default)]
    value: Vec<ItemResponse>,
    #[serde(default)]
    continuation_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    id: String,
    #[serde(rename = "type")]
    item_type: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct OperationState {
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionPayload<'a> {
    parts: Vec<PartPayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartPayload<'a> {
    path: &'a str,
    payload: &'a str,
    payload_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateItemRequest<'a> {
    display_name: &'a str,
    #[serde(rename = "type")]
    item_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    definition: DefinitionPayload<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateDefinitionRequest<'a> {
    definition: DefinitionPayload<'a>,
}

impl<'a> DefinitionPayload<'a> {
    fn from_item(item: &'a RepositoryItem) -> Self {
        Self {
            parts: item.parts.iter().map(PartPayload::inline).collect(),
        }
    }

    /// `updateMetadata=true` 요청은 `.platform` 파트를 반드시 포함해야 한다.
    fn with_metadata(item: &'a RepositoryItem) -> Self {
        let mut payload = Self::from_item(item);
        payload.parts.insert(0, PartPayload::inline(&item.metadata));
        payload
    }
}

impl<'a> PartPayload<'a> {
    fn inline(part: &'a DefinitionPart) -> Self {
        Self {
            path: &part.path,
            payload: &part.payload,
            payload_type: "InlineBase64",
        }
    }
}

impl FabricRestClient {
    /// 워크스페이스 대상 클라이언트를 생성한다.
    pub fn new(
        api_base: String,
        workspace_id: WorkspaceId,
        repository_directory: PathBuf,
        item_types: Vec<ItemType>,
        auth: ClientAuth,
        token_scope: String,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            workspace_id,
            repository_directory,
            item_types,
            auth,
            token_scope,
        })
    }

    fn items_endpoint(&self) -> String {
        format!(
            "{}/workspaces/{}/items",
            self.api_base,
            self.workspace_id.as_str()
        )
    }

    fn item_endpoint(&self, item_id: &str) -> String {
        format!("{}/{}", self.items_endpoint(), item_id)
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        // 선언된 인증 형태(credential/raw token)에 따라 bearer 값을 얻는다.
        let bearer = self.auth.bearer(&self.token_scope)?;
        Ok(self
            .client
            .request(method, url)
            .header("User-Agent", "fabric-deploy")
            .bearer_auth(bearer))
    }

    /// 원격 워크스페이스 아이템 전체를 페이지를 따라가며 조회한다.
    pub async fn list_items(&self) -> Result<Vec<RemoteItem>> {
        let mut items = Vec::new();
        let mut next = Some(self.items_endpoint());

        while let Some(url) = next.take() {
            let resp = self
                .request(Method::GET, &url)?
                .send()
                .await
                .context("fabric: failed to list items")?;
            let body = read_success(resp, "list items").await?;
            let page: ItemsPage =
                serde_json::from_str(&body).context("fabric: invalid items JSON")?;

            items.extend(page.value.into_iter().map(|i| RemoteItem {
                id: i.id,
                item_type: i.item_type,
                display_name: i.display_name,
            }));
            next = page.continuation_uri.filter(|u| !u.trim().is_empty());
        }

        debug!(count = items.len(), "listed remote items");
        Ok(items)
    }

    /// 범위 내 로컬 아이템을 생성/갱신한다.
    pub async fn publish_all_items(&self) -> Result<usize> {
        let local = scan_repository(&self.repository_directory, &self.item_types)?;
        let remote = self.list_items().await?;

        for planned in plan_publish(&local, &remote) {
            let item = planned.item;
            match planned.action {
                PublishAction::Create => {
                    info!(item_type = %item.item_type, name = %item.display_name, "creating item");
                    self.create_item(item).await?;
                }
                PublishAction::Update { item_id } => {
                    info!(
                        item_type = %item.item_type,
                        name = %item.display_name,
                        %item_id,
                        "updating item"
                    );
                    self.update_item(&item_id, item).await?;
                }
            }
        }

        Ok(local.len())
    }

    /// 로컬 저장소에 없는 범위 내 원격 아이템을 삭제한다.
    pub async fn unpublish_all_orphan_items(&self) -> Result<usize> {
        let local = scan_repository(&self.repository_directory, &self.item_types)?;
        let remote = self.list_items().await?;
        let orphans = find_orphans(&local, &remote, &self.item_types);

        for orphan in &orphans {
            info!(
                item_type = %orphan.item_type,
                name = %orphan.display_name,
                id = %orphan.id,
                "deleting orphan item"
            );
            let url = self.item_endpoint(&orphan.id);
            let resp = self
                .request(Method::DELETE, &url)?
                .send()
                .await
                .context("fabric: failed to delete item")?;
            read_success(resp, "delete item").await?;
        }

        Ok(orphans.len())
    }

    async fn create_item(&self, item: &RepositoryItem) -> Result<()> {
        let body = CreateItemRequest {
            display_name: &item.display_name,
            item_type: item.item_type.as_str(),
            description: item.description.as_deref(),
            definition: DefinitionPayload::from_item(item),
        };
        let resp = self
            .request(Method::POST, &self.items_endpoint())?
            .json(&body)
            .send()
            .await
            .with_context(|| format!("fabric: failed to create {}", item.display_name))?;
        self.complete(resp, "create item").await
    }

    async fn update_item(&self, item_id: &str, item: &RepositoryItem) -> Result<()> {
        let body = UpdateDefinitionRequest {
            definition: DefinitionPayload::with_metadata(item),
        };
        let url = format!("{}/updateDefinition", self.item_endpoint(item_id));
        let resp = self
            .request(Method::POST, &url)?
            .query(&[("updateMetadata", "true")])
            .json(&body)
            .send()
            .await
            .with_context(|| format!("fabric: failed to update {}", item.display_name))?;
        self.complete(resp, "update item").await
    }

    /// 202 Accepted 응답이면 Location의 작업 상태가 끝날 때까지 polling한다.
    async fn complete(&self, resp: Response, action: &str) -> Result<()> {
        if resp.status() != StatusCode::ACCEPTED {
            read_success(resp, action).await?;
            return Ok(());
        }

        let Some(location) = header_str(&resp, LOCATION) else {
            bail!("fabric: {action} was accepted without a Location header to poll");
        };
        let mut delay = retry_after(&resp);

        for _ in 0..MAX_POLLS {
            tokio::time::sleep(delay).await;
            let resp = self
                .request(Method::GET, &location)?
                .send()
                .await
                .with_context(|| format!("fabric: failed to poll {action} operation"))?;
            delay = retry_after(&resp);
            let body = read_success(resp, action).await?;
            let state: OperationState = serde_json::from_str(&body)
                .with_context(|| format!("fabric: invalid operation JSON for {action}"))?;

            match state.status.as_str() {
                "Succeeded" => return Ok(()),
                "Failed" | "Cancelled" => {
                    bail!("fabric: {action} operation {}: {body}", state.status)
                }
                _ => debug!(status = %state.status, "operation still running"),
            }
        }

        bail!("fabric: {action} operation did not finish after {MAX_POLLS} polls")
    }
}

fn header_str(resp: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn retry_after(resp: &Response) -> Duration {
    header_str(resp, RETRY_AFTER)
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_POLL_INTERVAL)
}

async fn read_success(resp: Response, action: &str) -> Result<String> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .with_context(|| format!("fabric: failed to read {action} response"))?;
    if !status.is_success() {
        bail!("fabric: failed to {action} ({status}): {body}");
    }
    Ok(body)
}
