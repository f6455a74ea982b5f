//! 워크스페이스 게이트웨이 포트 구현 어댑터.

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::application::ports::{
    ClientAuthMode, WorkspaceClientFactory, WorkspaceClientSpec, WorkspaceGateway,
};
use crate::infrastructure::fabric::FabricRestClient;

/// Fabric REST 클라이언트 팩토리 어댑터.
/// 어떤 인증 형태를 받을지는 생성 시점에 선언한다.
pub struct FabricClientFactoryAdapter {
    auth_mode: ClientAuthMode,
}

impl Default for FabricClientFactoryAdapter {
    fn default() -> Self {
        Self::new(ClientAuthMode::Credential)
    }
}

impl FabricClientFactoryAdapter {
    pub fn new(auth_mode: ClientAuthMode) -> Self {
        Self { auth_mode }
    }
}

impl WorkspaceClientFactory for FabricClientFactoryAdapter {
    fn auth_mode(&self) -> ClientAuthMode {
        self.auth_mode
    }

    fn build(&self, spec: WorkspaceClientSpec) -> Result<Box<dyn WorkspaceGateway>> {
        if spec.auth.mode() != self.auth_mode {
            bail!(
                "workspace client expects {:?} auth but received {:?}",
                self.auth_mode,
                spec.auth.mode()
            );
        }

        let inner = FabricRestClient::new(
            spec.api_base,
            spec.workspace_id,
            spec.repository_directory,
            spec.item_types,
            spec.auth,
            spec.token_scope,
        )?;
        Ok(Box::new(FabricGatewayAdapter { inner }))
    }
}

/// 인프라 Fabric 클라이언트를 애플리케이션 포트로 감싸는 래퍼.
struct FabricGatewayAdapter {
    inner: FabricRestClient,
}

#[async_trait]
impl WorkspaceGateway for FabricGatewayAdapter {
    async fn publish_all_items(&self) -> Result<usize> {
        self.inner.publish_all_items().await
    }

    async fn unpublish_all_orphan_items(&self) -> Result<usize> {
        self.inner.unpublish_all_orphan_items().await
    }
}
