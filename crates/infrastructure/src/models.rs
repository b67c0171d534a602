use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoError, TodoId};
use shared::UserId;
use std::collections::HashMap;

/// パーティションキー
pub const USER_ID_ATTR: &str = "userId";
/// ソートキー
pub const ID_ATTR: &str = "id";
pub const LABEL_ATTR: &str = "label";
pub const COMPLETE_ATTR: &str = "complete";

/// Todo テーブルのレコード（DynamoDB用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntity {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub complete: bool,
}

impl TodoEntity {
    pub fn new(user_id: &UserId, todo: &Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            user_id: user_id.as_str().to_string(),
            label: todo.label.clone(),
            complete: todo.complete,
        }
    }

    /// 保存済みデータの破損なので、id の不正も `Serialization` として扱う
    pub fn to_todo(&self) -> Result<Todo, TodoError> {
        let id = TodoId::parse(&self.id)
            .map_err(|e| TodoError::Serialization(format!("stored todo id: {e}")))?;
        Ok(Todo {
            id,
            label: self.label.clone(),
            complete: self.complete,
        })
    }

    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        let mut item = key(self.user_id.clone(), self.id.clone());
        item.insert(LABEL_ATTR.to_string(), AttributeValue::S(self.label.clone()));
        item.insert(COMPLETE_ATTR.to_string(), AttributeValue::Bool(self.complete));
        item
    }

    pub fn from_item(item: &HashMap<String, AttributeValue>) -> Result<Self, TodoError> {
        Ok(Self {
            id: string_attr(item, ID_ATTR)?,
            user_id: string_attr(item, USER_ID_ATTR)?,
            label: string_attr(item, LABEL_ATTR)?,
            complete: item
                .get(COMPLETE_ATTR)
                .and_then(|v| v.as_bool().ok())
                .copied()
                .ok_or_else(|| missing(COMPLETE_ATTR))?,
        })
    }
}

/// (userId, id) の主キー
pub fn key(user_id: String, id: String) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (USER_ID_ATTR.to_string(), AttributeValue::S(user_id)),
        (ID_ATTR.to_string(), AttributeValue::S(id)),
    ])
}

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String, TodoError> {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| missing(name))
}

fn missing(name: &str) -> TodoError {
    TodoError::Serialization(format!("attribute `{name}` is missing or has the wrong type"))
}
