//! CLI 명령 파싱 모듈.

use clap::Parser;

use crate::application::usecases::deploy::DeployOptions;
use crate::domain::environment::DEFAULT_ENVIRONMENT;

#[derive(Debug, Parser)]
#[command(name = "fabric-deploy", version)]
#[command(about = "Publish notebooks, pipelines and environments to a Fabric workspace")]
pub struct Cli {
    /// Target environment name (matched case-insensitively against the workspace table)
    #[arg(default_value = DEFAULT_ENVIRONMENT)]
    environment: String,
}

impl Cli {
    pub fn parse_options() -> DeployOptions {
        Self::parse().into_options()
    }

    pub fn into_options(self) -> DeployOptions {
        DeployOptions {
            environment: self.environment,
        }
    }
}
