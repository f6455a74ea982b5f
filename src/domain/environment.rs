//! 배포 대상 환경과 워크스페이스 식별자 값 객체.

use std::fmt;

use crate::domain::error::DeployError;

pub const DEFAULT_ENVIRONMENT: &str = "dev";

/// 대소문자/앞뒤 공백을 무시하는 배포 대상 환경 이름.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentName {
    raw: String,
    key: String,
}

impl EnvironmentName {
    /// 공백 제거 후 비어 있으면 설정 오류로 거부한다.
    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(DeployError::configuration("environment name is empty"));
        }
        Ok(Self {
            raw: raw.to_string(),
            key: raw.to_lowercase(),
        })
    }

    /// 비교용 정규화 키(trim + lowercase).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 사용자가 입력한 값(trim만 적용).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// 조회 테이블의 environment 필드와 일치하는지 판단한다.
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.trim().to_lowercase() == self.key
    }
}

impl Default for EnvironmentName {
    fn default() -> Self {
        Self {
            raw: DEFAULT_ENVIRONMENT.to_string(),
            key: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// 배포 대상 워크스페이스의 불투명 식별자.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// 공백 제거 후 비어 있지 않을 때만 생성된다.
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 조회 테이블의 한 행.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub environment: String,
    pub workspace_id: String,
}

impl WorkspaceRecord {
    pub fn new(environment: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            workspace_id: workspace_id.into(),
        }
    }
}
