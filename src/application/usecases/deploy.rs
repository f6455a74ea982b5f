//! 워크스페이스 배포 전체 흐름을 조율하는 유스케이스.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::{
    ClientAuth, ConfigRepository, EnvReader, Reporter, TokenProvider, WorkspaceClientFactory,
    WorkspaceClientSpec, WorkspaceTableSource,
};
use crate::application::usecases::resolve_workspace::ResolveWorkspaceUseCase;
use crate::domain::environment::EnvironmentName;

/// CLI에서 넘어온 실행 옵션.
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub environment: String,
}

/// 배포 실행 결과 요약.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    pub workspace_id: String,
    pub published: usize,
    pub unpublished: usize,
}

/// 설정 → 워크스페이스 해석 → 토큰 발급 → 게시 → orphan 정리 순서로 실행한다.
pub struct DeployUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub env: &'a dyn EnvReader,
    pub table_source: &'a dyn WorkspaceTableSource,
    pub token_provider: &'a dyn TokenProvider,
    pub client_factory: &'a dyn WorkspaceClientFactory,
    pub reporter: &'a dyn Reporter,
}

impl<'a> DeployUseCase<'a> {
    /// 배포 본 실행 진입점.
    /// 게시가 실패하면 orphan 정리는 시도하지 않는다.
    pub async fn execute(&self, options: DeployOptions) -> Result<DeploySummary> {
        let environment = EnvironmentName::parse(&options.environment)?;

        self.reporter.section("Load Config");
        let config = self
            .config_repo
            .load(self.env)
            .context("failed to load deploy configuration")?;

        let item_types = config
            .item_types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.reporter.kv("Environment", environment.as_str());
        self.reporter
            .kv("Repository", &config.repository_directory.display().to_string());
        self.reporter.kv("Item types", &item_types);

        self.reporter.section("Resolve Workspace");
        let resolver = ResolveWorkspaceUseCase {
            table_source: self.table_source,
            env: self.env,
        };
        let workspace_id = resolver.execute(
            &environment,
            &config.workspace_table,
            &config.workspace_id_env,
        )?;
        self.reporter.kv("Workspace", workspace_id.as_str());

        self.reporter.section("Authenticate");
        self.reporter.status("Identity", "requesting client-credentials token");
        let token = self
            .token_provider
            .acquire_token(&config.credentials)
            .await?;
        self.reporter.status("Identity", "token acquired");

        let auth_mode = self.client_factory.auth_mode();
        info!(?auth_mode, "building workspace client");
        let gateway = self.client_factory.build(WorkspaceClientSpec {
            workspace_id: workspace_id.clone(),
            repository_directory: config.repository_directory.clone(),
            item_types: config.item_types.clone(),
            auth: ClientAuth::for_mode(auth_mode, token),
            token_scope: config.credentials.scope.clone(),
            api_base: config.api_base.clone(),
        })?;

        self.reporter.section("Publish");
        let published = gateway
            .publish_all_items()
            .await
            .context("failed to publish items")?;
        self.reporter
            .status("Workspace", &format!("{published} item(s) published"));

        self.reporter.section("Unpublish Orphans");
        let unpublished = gateway
            .unpublish_all_orphan_items()
            .await
            .context("failed to unpublish orphan items")?;
        self.reporter
            .status("Workspace", &format!("{unpublished} orphan item(s) removed"));

        self.reporter.section("Done");
        Ok(DeploySummary {
            workspace_id: workspace_id.to_string(),
            published,
            unpublished,
        })
    }
}
