//! 환경변수 값을 실제 런타임 설정값으로 해석하는 유틸리티.
//!
//! - 환경변수 접근은 `EnvReader` 포트를 통해서만 수행한다.

use crate::application::ports::EnvReader;
use crate::domain::DeployError;

/// 앞뒤 공백을 제거한 값이 비어 있지 않을 때만 반환한다.
pub fn optional_var(env: &dyn EnvReader, name: &str) -> Option<String> {
    env.var(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 필수 환경변수를 읽는다. 없거나 공백이면 설정 오류.
pub fn required_var(env: &dyn EnvReader, name: &str) -> Result<String, DeployError> {
    optional_var(env, name).ok_or_else(|| {
        DeployError::configuration(format!(
            "required environment variable {name} is missing or empty"
        ))
    })
}

/// 선택 환경변수를 읽고 없으면 기본값을 사용한다.
pub fn var_or(env: &dyn EnvReader, name: &str, default: &str) -> String {
    optional_var(env, name).unwrap_or_else(|| default.to_string())
}
