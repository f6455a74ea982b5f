//! 토큰 발급 포트 구현 어댑터.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::ClientCredentials;
use crate::application::ports::TokenProvider;
use crate::domain::token::BearerToken;
use crate::infrastructure::identity::EntraIdClient;

/// Entra ID client-credentials 흐름으로 토큰을 발급하는 어댑터.
#[derive(Default)]
pub struct EntraTokenProvider {
    inner: EntraIdClient,
}

#[async_trait]
impl TokenProvider for EntraTokenProvider {
    async fn acquire_token(&self, credentials: &ClientCredentials) -> Result<BearerToken> {
        self.inner.acquire_token(credentials).await
    }
}
