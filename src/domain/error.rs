//! 배포 실행을 중단시키는 도메인 오류 종류.

use thiserror::Error;

/// 배포 오류 분류.
/// 모두 치명적이며 재시도하지 않는다. `anyhow::Error`에 담겨 전파되고
/// 호출자는 `downcast_ref::<DeployError>()`로 종류를 확인할 수 있다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    /// 필수 환경변수 누락/공백, 워크스페이스 ID 해석 실패
    #[error("configuration error: {0}")]
    Configuration(String),
    /// 조회 테이블을 읽을 수 없거나 대상 환경 행이 없고, fallback도 없음
    #[error("lookup error: {0}")]
    Lookup(String),
    /// identity provider가 토큰을 발급하지 않음
    #[error("authentication error: {0}")]
    Authentication(String),
}

impl DeployError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }
}
