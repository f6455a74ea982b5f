//! 환경변수 기반 배포 설정 로더.

use std::path::PathBuf;

use anyhow::{Context, Result};
use url::Url;

use super::resolve::{optional_var, required_var, var_or};
use crate::application::config::{
    ClientCredentials, DEFAULT_API_BASE, DEFAULT_AUTHORITY_HOST, DEFAULT_TOKEN_SCOPE,
    DEFAULT_WORKSPACE_ID_ENV, DEFAULT_WORKSPACE_TABLE, DeployConfig,
};
use crate::application::ports::EnvReader;
use crate::domain::DeployError;
use crate::domain::item::ItemType;

pub const TENANT_ID_ENV: &str = "AZURE_TENANT_ID";
pub const CLIENT_ID_ENV: &str = "AZURE_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "AZURE_CLIENT_SECRET";
pub const AUTHORITY_HOST_ENV: &str = "AZURE_AUTHORITY_HOST";
pub const TOKEN_SCOPE_ENV: &str = "FABRIC_TOKEN_SCOPE";
pub const WORKSPACE_TABLE_ENV: &str = "FABRIC_WORKSPACE_TABLE";
pub const REPOSITORY_DIR_ENV: &str = "FABRIC_REPOSITORY_DIR";
pub const API_BASE_ENV: &str = "FABRIC_API_BASE";

/// 필수/선택 환경변수를 읽어 `DeployConfig`를 구성한다.
pub(crate) fn load_deploy_config(env: &dyn EnvReader) -> Result<DeployConfig> {
    let credentials = ClientCredentials {
        tenant_id: required_var(env, TENANT_ID_ENV)?,
        client_id: required_var(env, CLIENT_ID_ENV)?,
        client_secret: required_var(env, CLIENT_SECRET_ENV)?,
        scope: var_or(env, TOKEN_SCOPE_ENV, DEFAULT_TOKEN_SCOPE),
        authority_host: validated_url(env, AUTHORITY_HOST_ENV, DEFAULT_AUTHORITY_HOST)?,
    };

    let repository_directory = match optional_var(env, REPOSITORY_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    Ok(DeployConfig {
        credentials,
        workspace_table: PathBuf::from(var_or(env, WORKSPACE_TABLE_ENV, DEFAULT_WORKSPACE_TABLE)),
        workspace_id_env: DEFAULT_WORKSPACE_ID_ENV.to_string(),
        repository_directory,
        item_types: ItemType::ALL.to_vec(),
        api_base: validated_url(env, API_BASE_ENV, DEFAULT_API_BASE)?,
    })
}

fn validated_url(env: &dyn EnvReader, name: &str, default: &str) -> Result<String, DeployError> {
    let value = var_or(env, name, default);
    Url::parse(&value).map_err(|e| {
        DeployError::configuration(format!("{name} is not a valid URL ({e}): {value}"))
    })?;
    Ok(value.trim_end_matches('/').to_string())
}
