use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Todo の書き込み・閲覧に必要なロール
pub const AUTHORISED_ROLE: &str = "authorised";

/// ホスティング基盤が付与するプリンシパルヘッダーの既定名
pub const DEFAULT_PRINCIPAL_HEADER: &str = "x-ms-client-principal";

/// 認証済みユーザーの識別子（DynamoDB のパーティションキーを兼ねる）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 認証基盤から受け取った呼び出し元の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            user_id: UserId::from_string(user_id.into()),
            roles,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// プリンシパルヘッダーに base64 で埋め込まれる JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPrincipal {
    #[serde(default)]
    pub identity_provider: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_details: Option<String>,
    #[serde(default)]
    pub user_roles: Vec<String>,
}

impl ClientPrincipal {
    /// ヘッダー値（base64 エンコードされた JSON）をデコードする
    pub fn decode(value: &str) -> Option<Self> {
        let bytes = STANDARD.decode(value.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// ヘッダー値としてエンコードする（テストやローカル開発用）
    pub fn encode(&self) -> String {
        // Serialize は構造体のフィールドだけで失敗しない
        let json = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(json)
    }

    pub fn from_headers(headers: &HeaderMap, header_name: &str) -> Option<Self> {
        let value = headers.get(header_name)?.to_str().ok()?;
        Self::decode(value)
    }

    /// userId を持たないプリンシパルは匿名扱い
    pub fn into_principal(self) -> Option<Principal> {
        let user_id = self.user_id.filter(|id| !id.trim().is_empty())?;
        Some(Principal {
            user_id: UserId::from_string(user_id),
            roles: self.user_roles,
        })
    }
}
