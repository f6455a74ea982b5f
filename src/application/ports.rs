//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{ClientCredentials, DeployConfig};
use crate::domain::environment::{WorkspaceId, WorkspaceRecord};
use crate::domain::item::ItemType;
use crate::domain::token::{BearerToken, StaticTokenCredential, TokenCredential};

/// 환경변수 읽기 포트. 프로세스 환경을 직접 만지지 않게 한다.
pub trait EnvReader: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// 배포 설정을 구성하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self, env: &dyn EnvReader) -> Result<DeployConfig>;
}

/// 워크스페이스 조회 테이블 로딩 결과.
#[derive(Debug)]
pub enum TableLoad {
    /// 테이블 파일이 없음
    Missing,
    Loaded(Vec<WorkspaceRecord>),
}

/// 워크스페이스 조회 테이블 포트.
/// 파일이 있지만 읽기/파싱에 실패하면 `Err`를 반환한다.
pub trait WorkspaceTableSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<TableLoad>;
}

/// client-credentials 토큰 발급 포트.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn acquire_token(&self, credentials: &ClientCredentials) -> Result<BearerToken>;
}

/// 워크스페이스 클라이언트가 받는 인증 형태(선언된 capability).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAuthMode {
    /// `TokenCredential` 객체를 받는 클라이언트
    Credential,
    /// raw bearer 문자열을 받는 클라이언트
    RawToken,
}

/// 워크스페이스 클라이언트에 전달하는 인증 값.
#[derive(Clone)]
pub enum ClientAuth {
    Credential(Arc<dyn TokenCredential>),
    RawToken(String),
}

impl ClientAuthMode {
    /// 설정 문자열(credential/token)을 해석한다.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credential" => Some(Self::Credential),
            "token" | "raw" | "raw_token" => Some(Self::RawToken),
            _ => None,
        }
    }
}

impl ClientAuth {
    /// 선언된 호출 형태에 맞춰 발급된 토큰을 감싼다.
    pub fn for_mode(mode: ClientAuthMode, token: BearerToken) -> Self {
        match mode {
            ClientAuthMode::Credential => {
                ClientAuth::Credential(Arc::new(StaticTokenCredential::new(token)))
            }
            ClientAuthMode::RawToken => ClientAuth::RawToken(token.secret),
        }
    }

    pub fn mode(&self) -> ClientAuthMode {
        match self {
            ClientAuth::Credential(_) => ClientAuthMode::Credential,
            ClientAuth::RawToken(_) => ClientAuthMode::RawToken,
        }
    }

    /// 요청 헤더에 넣을 bearer 문자열을 얻는다.
    pub fn bearer(&self, scope: &str) -> Result<String> {
        match self {
            ClientAuth::Credential(credential) => Ok(credential.get_token(&[scope])?.secret),
            ClientAuth::RawToken(token) => Ok(token.clone()),
        }
    }
}

/// 워크스페이스 클라이언트 생성 파라미터.
#[derive(Clone)]
pub struct WorkspaceClientSpec {
    pub workspace_id: WorkspaceId,
    pub repository_directory: PathBuf,
    pub item_types: Vec<ItemType>,
    pub auth: ClientAuth,
    /// credential에 토큰을 요청할 때 사용할 scope
    pub token_scope: String,
    pub api_base: String,
}

/// 원격 워크스페이스 게시/정리 포트.
#[async_trait]
pub trait WorkspaceGateway: Send + Sync {
    /// 범위 내 로컬 아이템을 모두 게시하고 게시 건수를 반환한다.
    async fn publish_all_items(&self) -> Result<usize>;
    /// 로컬에 없는 범위 내 원격 아이템을 삭제하고 삭제 건수를 반환한다.
    async fn unpublish_all_orphan_items(&self) -> Result<usize>;
}

/// 선언된 인증 형태에 맞는 워크스페이스 게이트웨이를 생성하는 팩토리 포트.
pub trait WorkspaceClientFactory: Send + Sync {
    fn auth_mode(&self) -> ClientAuthMode;
    fn build(&self, spec: WorkspaceClientSpec) -> Result<Box<dyn WorkspaceGateway>>;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
}
