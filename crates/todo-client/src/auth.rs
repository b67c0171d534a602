use async_trait::async_trait;
use serde::Deserialize;
use shared::{ClientPrincipal, AUTHORISED_ROLE};
use tracing::warn;
use url::Url;

use crate::ClientError;

/// 現在のユーザーが API を呼べる（必要ロールを持つ）かどうか
#[async_trait]
pub trait AuthenticationStateProvider: Send + Sync {
    async fn is_authorised(&self) -> bool;
}

/// 固定の認証状態（テストやオフライン利用向け）
#[derive(Debug, Clone, Copy)]
pub struct StaticAuthState(pub bool);

#[async_trait]
impl AuthenticationStateProvider for StaticAuthState {
    async fn is_authorised(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthMeResponse {
    client_principal: Option<ClientPrincipal>,
}

/// ホスティング基盤の `/.auth/me` からプリンシパルを取得して判定する
pub struct AuthMeProvider {
    http: reqwest::Client,
    url: Url,
    required_role: String,
}

impl AuthMeProvider {
    pub fn new(http: reqwest::Client, site_base: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            url: Url::parse(site_base)?.join("/.auth/me")?,
            required_role: AUTHORISED_ROLE.to_string(),
        })
    }

    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = role.into();
        self
    }

    async fn fetch_principal(&self) -> Result<Option<ClientPrincipal>, reqwest::Error> {
        let response: AuthMeResponse = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.client_principal)
    }
}

#[async_trait]
impl AuthenticationStateProvider for AuthMeProvider {
    async fn is_authorised(&self) -> bool {
        match self.fetch_principal().await {
            Ok(Some(principal)) => principal.user_roles.contains(&self.required_role),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Failed to read authentication state, treating as anonymous");
                false
            }
        }
    }
}
