//! bearer 토큰과 "현재 토큰 제공" 자격증명 capability.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::error::DeployError;

/// 응답에 만료 정보가 없을 때 가정하는 토큰 유효 기간(초).
pub const ASSUMED_TOKEN_LIFETIME_SECS: u64 = 3600;

/// 한 번의 배포 실행 동안 사용하는 access token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub secret: String,
    /// 만료 시각(epoch seconds)
    pub expires_on: u64,
}

impl BearerToken {
    pub fn new(secret: impl Into<String>, expires_on: u64) -> Self {
        Self {
            secret: secret.into(),
            expires_on,
        }
    }

    /// 지금부터 `lifetime_secs` 뒤에 만료되는 토큰을 만든다.
    pub fn expiring_in(secret: impl Into<String>, lifetime_secs: u64) -> Self {
        Self::new(secret, now_epoch_secs().saturating_add(lifetime_secs))
    }

    pub fn is_expired(&self) -> bool {
        self.expires_on <= now_epoch_secs()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("secret", &"<redacted>")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}

/// SDK가 raw 문자열 대신 요구하는 "현재 토큰 제공" capability.
pub trait TokenCredential: Send + Sync {
    fn get_token(&self, scopes: &[&str]) -> Result<BearerToken, DeployError>;
}

/// 이미 발급된 토큰을 그대로 돌려주는 자격증명 어댑터.
/// scope와 무관하게 같은 토큰을 반환하며 갱신하지 않는다.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: BearerToken,
}

impl StaticTokenCredential {
    pub fn new(token: BearerToken) -> Self {
        Self { token }
    }
}

impl TokenCredential for StaticTokenCredential {
    fn get_token(&self, _scopes: &[&str]) -> Result<BearerToken, DeployError> {
        Ok(self.token.clone())
    }
}

pub fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
