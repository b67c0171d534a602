use domain::{Todo, TodoId};

/// 取得前と「取得済みで空」を区別するキャッシュ状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TodoCache {
    #[default]
    Unloaded,
    Loaded(Vec<Todo>),
}

impl TodoCache {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TodoCache::Loaded(_))
    }

    pub fn todos(&self) -> Option<&[Todo]> {
        match self {
            TodoCache::Unloaded => None,
            TodoCache::Loaded(todos) => Some(todos.as_slice()),
        }
    }

    /// 未取得の場合はこの Todo だけを持つ取得済み状態になる
    pub fn push(&mut self, todo: Todo) {
        match self {
            TodoCache::Unloaded => *self = TodoCache::Loaded(vec![todo]),
            TodoCache::Loaded(todos) => todos.push(todo),
        }
    }

    pub fn position(&self, id: TodoId) -> Option<usize> {
        self.todos()?.iter().position(|t| t.id == id)
    }

    pub fn replace(&mut self, index: usize, todo: Todo) {
        if let TodoCache::Loaded(todos) = self {
            if let Some(slot) = todos.get_mut(index) {
                *slot = todo;
            }
        }
    }

    pub fn remove(&mut self, id: TodoId) {
        if let TodoCache::Loaded(todos) = self {
            todos.retain(|t| t.id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_is_distinct_from_empty() {
        let unloaded = TodoCache::default();
        let empty = TodoCache::Loaded(Vec::new());

        assert!(!unloaded.is_loaded());
        assert_eq!(unloaded.todos(), None);
        assert!(empty.is_loaded());
        assert_eq!(empty.todos(), Some(&[][..]));
    }

    #[test]
    fn test_push_on_unloaded_marks_loaded() {
        let mut cache = TodoCache::Unloaded;
        let todo = Todo::new("first");

        cache.push(todo.clone());

        assert_eq!(cache, TodoCache::Loaded(vec![todo]));
    }

    #[test]
    fn test_position_replace_remove() {
        let a = Todo::new("a");
        let b = Todo::new("b");
        let mut cache = TodoCache::Loaded(vec![a.clone(), b.clone()]);

        assert_eq!(cache.position(b.id), Some(1));
        assert_eq!(cache.position(Todo::new("c").id), None);

        let done = Todo {
            complete: true,
            ..b.clone()
        };
        cache.replace(1, done.clone());
        assert_eq!(cache.todos().unwrap()[1], done);

        cache.remove(a.id);
        assert_eq!(cache.todos().unwrap(), &[done][..]);
    }
}
