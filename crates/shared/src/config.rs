use crate::auth::{AUTHORISED_ROLE, DEFAULT_PRINCIPAL_HEADER};
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// 呼び出し元の情報をどこから取り出すか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// base64 JSON のプリンシパルヘッダー
    PrincipalHeader,
    /// API Gateway HTTP API の JWT オーソライザーのクレーム
    ApiGatewayJwt,
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "principal-header" => Ok(AuthMode::PrincipalHeader),
            "api-gateway-jwt" => Ok(AuthMode::ApiGatewayJwt),
            other => Err(ConfigError::InvalidValue {
                key: "AUTH_MODE",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub environment: String,
    pub aws_region: String,
    pub auth_mode: AuthMode,
    pub principal_header: String,
    pub required_role: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let auth_mode = get("AUTH_MODE", "principal-header").parse()?;
        let port_raw = get("PORT", "3000");
        let port = port_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "PORT",
            value: port_raw.clone(),
        })?;

        Ok(Config {
            dynamodb_table: get("DYNAMODB_TABLE", "todos"),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|e| !e.is_empty()),
            environment: get("ENVIRONMENT", "dev"),
            aws_region: get("AWS_REGION", "ap-northeast-1"),
            auth_mode,
            principal_header: get("PRINCIPAL_HEADER", DEFAULT_PRINCIPAL_HEADER),
            required_role: get("REQUIRED_ROLE", AUTHORISED_ROLE),
            port,
        })
    }
}
