//! 설정 저장소 포트 구현 어댑터.

use anyhow::Result;

use crate::application::config::DeployConfig;
use crate::application::ports::{ConfigRepository, EnvReader};
use crate::infrastructure::config;

/// 환경변수 기반 설정 저장소 어댑터.
pub struct EnvConfigRepository;

impl ConfigRepository for EnvConfigRepository {
    fn load(&self, env: &dyn EnvReader) -> Result<DeployConfig> {
        config::load(env)
    }
}
