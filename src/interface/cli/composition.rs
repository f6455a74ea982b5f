//! 애플리케이션 조립(composition root) 모듈.

use anyhow::Result;

use crate::application::ports::{ClientAuthMode, EnvReader};
use crate::application::usecases::deploy::DeployUseCase;
use crate::domain::DeployError;
use crate::infrastructure::adapters::{
    ConsoleReporter, CsvWorkspaceTable, EntraTokenProvider, EnvConfigRepository,
    FabricClientFactoryAdapter, ProcessEnvReader,
};
use crate::infrastructure::config::optional_var;

/// 워크스페이스 클라이언트 호출 형태를 선언하는 환경변수.
pub const CLIENT_AUTH_ENV: &str = "FABRIC_CLIENT_AUTH";

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    env: ProcessEnvReader,
    config_repo: EnvConfigRepository,
    table_source: CsvWorkspaceTable,
    token_provider: EntraTokenProvider,
    client_factory: FabricClientFactoryAdapter,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self::new(ClientAuthMode::Credential)
    }
}

impl AppComposition {
    /// 워크스페이스 클라이언트가 받을 인증 형태를 지정해 조합을 생성한다.
    pub fn new(auth_mode: ClientAuthMode) -> Self {
        Self {
            env: ProcessEnvReader,
            config_repo: EnvConfigRepository,
            table_source: CsvWorkspaceTable,
            token_provider: EntraTokenProvider::default(),
            client_factory: FabricClientFactoryAdapter::new(auth_mode),
            reporter: ConsoleReporter,
        }
    }

    /// `FABRIC_CLIENT_AUTH`(credential/token)에 따라 조합을 생성한다.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(client_auth_mode(&ProcessEnvReader)?))
    }

    /// 배포 실행 유스케이스를 생성한다.
    pub fn deploy_usecase(&self) -> DeployUseCase<'_> {
        DeployUseCase {
            config_repo: &self.config_repo,
            env: &self.env,
            table_source: &self.table_source,
            token_provider: &self.token_provider,
            client_factory: &self.client_factory,
            reporter: &self.reporter,
        }
    }
}

fn client_auth_mode(env: &dyn EnvReader) -> Result<ClientAuthMode> {
    let Some(raw) = optional_var(env, CLIENT_AUTH_ENV) else {
        return Ok(ClientAuthMode::Credential);
    };
    ClientAuthMode::parse(&raw).ok_or_else(|| {
        DeployError::configuration(format!(
            "{CLIENT_AUTH_ENV} must be 'credential' or 'token', got '{raw}'"
        ))
        .into()
    })
}
