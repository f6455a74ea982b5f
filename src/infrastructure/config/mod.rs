//! 배포 설정 로딩 모듈.
//! 프로세스 환경변수에서 자격증명/경로/엔드포인트를 읽어 `DeployConfig`로 만든다.

mod loader;
mod resolve;

use anyhow::Result;

use crate::application::config::DeployConfig;
use crate::application::ports::EnvReader;

pub use loader::{
    API_BASE_ENV, AUTHORITY_HOST_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV, REPOSITORY_DIR_ENV,
    TENANT_ID_ENV, TOKEN_SCOPE_ENV, WORKSPACE_TABLE_ENV,
};
pub use resolve::{optional_var, required_var};

/// 환경변수에서 최종 배포 설정을 로딩한다.
pub fn load(env: &dyn EnvReader) -> Result<DeployConfig> {
    loader::load_deploy_config(env)
}
