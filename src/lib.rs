//! fabric-deploy library root.
//! Clean Architecture 계층을 외부에 노출한다.

use anyhow::Result;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

use application::usecases::deploy::{DeployOptions, DeploySummary};
use interface::cli::AppComposition;

/// 라이브러리 직접 호출용 실행 함수.
pub async fn run(options: DeployOptions) -> Result<DeploySummary> {
    let composition = AppComposition::from_env()?;
    composition.deploy_usecase().execute(options).await
}
