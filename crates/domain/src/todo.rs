use crate::errors::TodoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Todo の識別子（サーバー側で採番される UUID v4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// 文字列表現から TodoId を復元する
    pub fn parse(id: &str) -> Result<Self, TodoError> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| TodoError::InvalidTodoId(format!("{id}: {e}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// クライアントに公開される Todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub label: String,
    pub complete: bool,
}

impl Todo {
    /// 新しい未完了の Todo を作成する
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: TodoId::new(),
            label: label.into(),
            complete: false,
        }
    }
}

/// 空文字または空白のみのラベルは受け付けない
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
