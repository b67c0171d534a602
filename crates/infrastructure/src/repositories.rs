use crate::models::{key, TodoEntity, USER_ID_ATTR};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use domain::{Todo, TodoError};
use shared::UserId;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};

/// ユーザー単位（パーティション = userId）の Todo 永続化
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// ユーザーの全 Todo を取得する（順序は保証しない）
    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// 新しい Todo を採番して保存する
    async fn add(&self, user_id: &UserId, label: &str) -> Result<Todo, TodoError>;

    /// (todo.id, user_id) のレコードを丸ごと置き換える。
    /// 存在しない場合は `TodoError::NotFound`
    async fn update(&self, user_id: &UserId, todo: &Todo) -> Result<(), TodoError>;

    /// 冪等な削除。存在しない id でも成功する
    async fn delete(&self, user_id: &UserId, id: &str) -> Result<(), TodoError>;
}

pub struct DynamoTodoRepository {
    db: DynamoDbClient,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoTodoRepository {
    #[instrument(skip(self), fields(table = %self.db.table_name()))]
    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        let mut todos = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages = 0;

        loop {
            let output = self
                .db
                .client()
                .query()
                .table_name(self.db.table_name())
                .key_condition_expression(format!("{USER_ID_ATTR} = :user_id"))
                .expression_attribute_values(
                    ":user_id",
                    AttributeValue::S(user_id.as_str().to_string()),
                )
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| dynamodb_error("query", e))?;
            pages += 1;

            for item in output.items() {
                let todo = TodoEntity::from_item(item)
                    .and_then(|entity| entity.to_todo())
                    .inspect_err(|e| error!(error = %e, "Unreadable todo item"))?;
                todos.push(todo);
            }

            match output.last_evaluated_key {
                Some(last_key) if !last_key.is_empty() => start_key = Some(last_key),
                _ => break,
            }
        }

        debug!(count = todos.len(), pages, "Todos listed");
        Ok(todos)
    }

    #[instrument(skip(self, label), fields(table = %self.db.table_name()))]
    async fn add(&self, user_id: &UserId, label: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(label);
        let entity = TodoEntity::new(user_id, &todo);

        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(entity.to_item()))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await
            .map_err(|e| dynamodb_error("put_item", e))?;

        info!(todo_id = %todo.id, "Todo created");
        Ok(todo)
    }

    #[instrument(skip(self, todo), fields(table = %self.db.table_name(), todo_id = %todo.id))]
    async fn update(&self, user_id: &UserId, todo: &Todo) -> Result<(), TodoError> {
        let entity = TodoEntity::new(user_id, todo);

        let result = self
            .db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(entity.to_item()))
            .condition_expression("attribute_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => {
                info!("Todo replaced");
                Ok(())
            }
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Err(TodoError::NotFound(todo.id.to_string()))
            }
            Err(e) => Err(dynamodb_error("put_item", e)),
        }
    }

    #[instrument(skip(self), fields(table = %self.db.table_name()))]
    async fn delete(&self, user_id: &UserId, id: &str) -> Result<(), TodoError> {
        let output = self
            .db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(key(user_id.as_str().to_string(), id.to_string())))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| dynamodb_error("delete_item", e))?;

        if output.attributes().is_some() {
            info!("Todo deleted");
        } else {
            debug!("Todo already absent, nothing to delete");
        }
        Ok(())
    }
}

fn dynamodb_error<E: std::error::Error>(operation: &str, err: E) -> TodoError {
    let message = DisplayErrorContext(&err).to_string();
    error!(operation, error = %message, "DynamoDB operation failed");
    TodoError::DynamoDb(message)
}
