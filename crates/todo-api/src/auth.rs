//! 呼び出し元の認証・認可
//!
//! 資格情報の検証はホスティング基盤の責務で、ここでは基盤が付与した
//! プリンシパルをそのまま信頼する。全エンドポイント共通のロール確認は
//! `AuthorisedUser` エクストラクターに集約している。

use crate::error::ApiError;
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use lambda_http::request::RequestContext;
use shared::{AuthMode, ClientPrincipal, Config, Principal, UserId};
use std::sync::Arc;

/// リクエストから呼び出し元を取り出す
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, parts: &Parts) -> Option<Principal>;
}

/// base64 JSON のプリンシパルヘッダーを読む
pub struct PrincipalHeaderAuthenticator {
    header_name: String,
}

impl PrincipalHeaderAuthenticator {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into().to_ascii_lowercase(),
        }
    }
}

impl Authenticator for PrincipalHeaderAuthenticator {
    fn authenticate(&self, parts: &Parts) -> Option<Principal> {
        ClientPrincipal::from_headers(&parts.headers, &self.header_name)?.into_principal()
    }
}

/// API Gateway HTTP API の JWT オーソライザーが検証済みのクレームを読む
pub struct ApiGatewayJwtAuthenticator;

impl Authenticator for ApiGatewayJwtAuthenticator {
    fn authenticate(&self, parts: &Parts) -> Option<Principal> {
        let Some(RequestContext::ApiGatewayV2(ctx)) = parts.extensions.get::<RequestContext>()
        else {
            return None;
        };
        let jwt = ctx.authorizer.as_ref()?.jwt.as_ref()?;
        let user_id = jwt.claims.get("sub").filter(|sub| !sub.is_empty())?;
        let roles = jwt
            .claims
            .get("cognito:groups")
            .map(|groups| parse_groups(groups))
            .unwrap_or_default();

        Some(Principal::new(user_id.clone(), roles))
    }
}

/// HTTP API は配列クレームを "[a b]" 形式の文字列で渡してくる
fn parse_groups(raw: &str) -> Vec<String> {
    raw.trim_matches(|c| c == '[' || c == ']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn authenticator_for(config: &Config) -> Arc<dyn Authenticator> {
    match config.auth_mode {
        AuthMode::PrincipalHeader => {
            Arc::new(PrincipalHeaderAuthenticator::new(&config.principal_header))
        }
        AuthMode::ApiGatewayJwt => Arc::new(ApiGatewayJwtAuthenticator),
    }
}

/// 必要なロールを持つ認証済みユーザー
#[derive(Debug, Clone)]
pub struct AuthorisedUser(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for AuthorisedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let principal = state
            .authenticator
            .authenticate(parts)
            .ok_or_else(|| ApiError::Unauthorized("missing or unreadable principal".to_string()))?;

        if !principal.has_role(&state.required_role) {
            return Err(ApiError::Unauthorized(format!(
                "user {} lacks role `{}`",
                principal.user_id, state.required_role
            )));
        }

        Ok(AuthorisedUser(principal.user_id))
    }
}
