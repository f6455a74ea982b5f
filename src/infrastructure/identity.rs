//! Microsoft Entra ID client-credentials 토큰 발급 구현.

use std::time::Duration;

use anyhow::Result;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::application::config::ClientCredentials;
use crate::domain::DeployError;
use crate::domain::token::{ASSUMED_TOKEN_LIFETIME_SECS, BearerToken};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// URL path segment에서 unreserved 문자는 그대로 둔다.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub struct EntraIdClient {
    client: Client,
}

impl Default for EntraIdClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<serde_json::Value>,
}

impl EntraIdClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// `{authority_host}/{tenant_id}` authority를 구성한다.
    pub fn authority(credentials: &ClientCredentials) -> String {
        format!(
            "{}/{}",
            credentials.authority_host.trim_end_matches('/'),
            utf8_percent_encode(credentials.tenant_id.trim(), PATH_SEGMENT)
        )
    }

    fn token_endpoint(credentials: &ClientCredentials) -> String {
        format!("{}/oauth2/v2.0/token", Self::authority(credentials))
    }

    /// client-credentials grant 한 번으로 access token을 받는다. 재시도/캐시 없음.
    pub async fn acquire_token(&self, credentials: &ClientCredentials) -> Result<BearerToken> {
        validate(credentials)?;

        let endpoint = Self::token_endpoint(credentials);
        debug!(%endpoint, client_id = %credentials.client_id, scope = %credentials.scope, "requesting token");

        let resp = self
            .client
            .post(&endpoint)
            .header("User-Agent", "fabric-deploy")
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("scope", credentials.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                DeployError::authentication(format!("token request to {endpoint} failed: {e}"))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            DeployError::authentication(format!("failed to read token response ({status}): {e}"))
        })?;

        let token = parse_token_response(&body).ok_or_else(|| {
            DeployError::authentication(format!(
                "no access_token in identity provider response ({status}): {body}"
            ))
        })?;
        debug!(expires_on = token.expires_on, "token acquired");
        Ok(token)
    }
}

fn validate(credentials: &ClientCredentials) -> Result<(), DeployError> {
    let fields = [
        ("tenant id", &credentials.tenant_id),
        ("client id", &credentials.client_id),
        ("client secret", &credentials.client_secret),
        ("scope", &credentials.scope),
    ];
    for (label, value) in fields {
        if value.trim().is_empty() {
            return Err(DeployError::configuration(format!("{label} is empty")));
        }
    }
    Ok(())
}

/// 토큰 응답에서 access token과 만료 시각을 뽑는다.
/// `expires_in`이 없거나 0 이하이면 가정 유효 기간을 사용한다.
fn parse_token_response(body: &str) -> Option<BearerToken> {
    let parsed: TokenResponse = serde_json::from_str(body).ok()?;
    let secret = parsed.access_token.filter(|t| !t.trim().is_empty())?;

    // 일부 엔드포인트는 expires_in을 문자열로 돌려준다.
    let lifetime = parsed
        .expires_in
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .filter(|secs| *secs > 0)
        .unwrap_or(ASSUMED_TOKEN_LIFETIME_SECS);

    Some(BearerToken::expiring_in(secret, lifetime))
}
