use crate::TodoRepository;
use async_trait::async_trait;
use domain::{Todo, TodoError, TodoId};
use shared::UserId;
use std::collections::HashMap;
use std::sync::RwLock;

/// 簡易な InMemory 実装（開発/テスト用）
/// DynamoDB と同じく userId でパーティションを分ける
#[derive(Default)]
pub struct InMemoryTodoRepository {
    partitions: RwLock<HashMap<UserId, HashMap<TodoId, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> TodoError {
    TodoError::Internal("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self, user_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        let partitions = self.partitions.read().map_err(poisoned)?;
        Ok(partitions
            .get(user_id)
            .map(|todos| todos.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn add(&self, user_id: &UserId, label: &str) -> Result<Todo, TodoError> {
        let todo = Todo::new(label);
        let mut partitions = self.partitions.write().map_err(poisoned)?;
        partitions
            .entry(user_id.clone())
            .or_default()
            .insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(&self, user_id: &UserId, todo: &Todo) -> Result<(), TodoError> {
        let mut partitions = self.partitions.write().map_err(poisoned)?;
        let stored = partitions
            .get_mut(user_id)
            .and_then(|todos| todos.get_mut(&todo.id))
            .ok_or_else(|| TodoError::NotFound(todo.id.to_string()))?;
        *stored = todo.clone();
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, id: &str) -> Result<(), TodoError> {
        // UUID でない id は保存され得ないので削除済みと同じ扱い
        let Ok(todo_id) = TodoId::parse(id) else {
            return Ok(());
        };
        let mut partitions = self.partitions.write().map_err(poisoned)?;
        if let Some(todos) = partitions.get_mut(user_id) {
            todos.remove(&todo_id);
        }
        Ok(())
    }
}
