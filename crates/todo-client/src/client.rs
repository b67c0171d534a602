use domain::{is_blank, Todo, TodoId};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::{AuthenticationStateProvider, ClientError, TodoCache};

/// Todo API のクライアント側プロキシ
///
/// 操作は `&mut self` を取るため、呼び出し側から見て常に逐次実行される。
pub struct TodoClient {
    http: reqwest::Client,
    api_base: Url,
    auth: Arc<dyn AuthenticationStateProvider>,
    cache: TodoCache,
}

impl TodoClient {
    /// `api_base` は `/todos` の親（例: `https://example.com/api/`）
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        auth: Arc<dyn AuthenticationStateProvider>,
    ) -> Result<Self, ClientError> {
        let mut api_base = Url::parse(api_base)?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(Self {
            http,
            api_base,
            auth,
            cache: TodoCache::Unloaded,
        })
    }

    /// 未取得の間は `None`
    pub fn todos(&self) -> Option<&[Todo]> {
        self.cache.todos()
    }

    /// 一度だけ一覧を取得する。未ログインなら空の一覧になる
    pub async fn load(&mut self) -> Result<(), ClientError> {
        if self.cache.is_loaded() {
            return Ok(());
        }

        let todos = if self.auth.is_authorised().await {
            self.http
                .get(self.todos_url()?)
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Todo>>()
                .await?
        } else {
            debug!("Anonymous user, starting with an empty todo list");
            Vec::new()
        };

        self.cache = TodoCache::Loaded(todos);
        Ok(())
    }

    /// 空白のみのラベルは無視する。未ログイン時はローカルにだけ追加する
    pub async fn add(&mut self, label: &str) -> Result<(), ClientError> {
        if is_blank(label) {
            return Ok(());
        }

        let mut todo = Todo::new(label);

        if self.auth.is_authorised().await {
            // サーバー採番の id に差し替える
            todo = self
                .http
                .post(self.todos_url()?)
                .json(&label)
                .send()
                .await?
                .error_for_status()?
                .json::<Todo>()
                .await?;
        }

        self.cache.push(todo);
        Ok(())
    }

    /// キャッシュ済みの Todo を置き換える。サーバー更新に失敗してもロールバックはしない
    pub async fn update(&mut self, todo: Todo) -> Result<(), ClientError> {
        if !self.cache.is_loaded() {
            return Ok(());
        }

        let index = self
            .cache
            .position(todo.id)
            .ok_or(ClientError::UnknownTodo(todo.id))?;

        if self.auth.is_authorised().await {
            self.http
                .put(self.todos_url()?)
                .json(&todo)
                .send()
                .await?
                .error_for_status()?;
        }

        self.cache.replace(index, todo);
        Ok(())
    }

    /// 削除はサーバー側で冪等なので、キャッシュにない id でも送る
    pub async fn remove(&mut self, id: TodoId) -> Result<(), ClientError> {
        if !self.cache.is_loaded() {
            return Ok(());
        }

        if self.auth.is_authorised().await {
            self.http
                .delete(self.api_base.join(&format!("todos/{id}"))?)
                .send()
                .await?
                .error_for_status()?;
        }

        self.cache.remove(id);
        Ok(())
    }

    fn todos_url(&self) -> Result<Url, ClientError> {
        Ok(self.api_base.join("todos")?)
    }
}
