//! 애플리케이션이 사용하는 배포 설정 스키마(순수 데이터).
//!
//! 주의: 환경변수/파일 접근은 `infrastructure`에서만 수행한다.
//! 해석된 값은 프로세스 환경에 다시 쓰지 않고 이 구조체로만 전달한다.

use std::fmt;
use std::path::PathBuf;

use crate::domain::item::ItemType;

pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_TOKEN_SCOPE: &str = "https://api.fabric.microsoft.com/.default";
pub const DEFAULT_API_BASE: &str = "https://api.fabric.microsoft.com/v1";
pub const DEFAULT_WORKSPACE_TABLE: &str = "deploy/workspaces.csv";
pub const DEFAULT_WORKSPACE_ID_ENV: &str = "FABRIC_WORKSPACE_ID";

/// 한 번의 배포 실행에 필요한 해석 완료된 설정.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub credentials: ClientCredentials,
    /// 워크스페이스 조회 CSV 경로
    pub workspace_table: PathBuf,
    /// 조회 실패 시 워크스페이스 ID를 읽을 환경변수 이름
    pub workspace_id_env: String,
    /// 게시할 아이템이 들어있는 로컬 저장소 경로
    pub repository_directory: PathBuf,
    /// 게시/정리 대상 아이템 종류
    pub item_types: Vec<ItemType>,
    /// 워크스페이스 REST API base URL
    pub api_base: String,
}

/// client-credentials 교환 입력값.
#[derive(Clone)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub authority_host: String,
}

impl ClientCredentials {
    /// 기본 authority host/scope로 자격증명을 구성한다.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: DEFAULT_TOKEN_SCOPE.to_string(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("authority_host", &self.authority_host)
            .finish()
    }
}
