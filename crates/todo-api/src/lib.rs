//! ユーザー単位の Todo HTTP API
//!
//! `GET/POST/PUT /todos` と `DELETE /todos/{id}` を提供する。
//! 全エンドポイントで `auth::AuthorisedUser` による認可を通してから
//! `TodoRepository` に委譲する。

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
    Router,
};
use infrastructure::{DynamoDbClient, DynamoTodoRepository, TodoRepository};
use shared::{Config, AUTHORISED_ROLE};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub mod auth;
pub mod error;
pub mod handlers;

use auth::{authenticator_for, Authenticator};

/// アプリケーションの共有状態（リクエスト間で可変状態を持たない）
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn TodoRepository>,
    authenticator: Arc<dyn Authenticator>,
    required_role: Arc<str>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            repo,
            authenticator,
            required_role: Arc::from(AUTHORISED_ROLE),
        }
    }

    pub fn with_required_role(mut self, role: &str) -> Self {
        self.required_role = Arc::from(role);
        self
    }

    /// 設定から DynamoDB バックエンドの状態を組み立てる
    pub async fn from_config(config: &Config) -> Self {
        let db = DynamoDbClient::new(config).await;
        info!(
            table = db.table_name(),
            environment = %config.environment,
            auth_mode = ?config.auth_mode,
            "DynamoDB todo store configured"
        );

        Self::new(
            Arc::new(DynamoTodoRepository::new(db)),
            authenticator_for(config),
        )
        .with_required_role(&config.required_role)
    }
}

/// ルータを構築して返します。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .put(handlers::update_todo),
        )
        .route("/todos/", delete(handlers::delete_todo_without_id))
        .route("/todos/:id", delete(handlers::delete_todo))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = started.elapsed().as_millis() as u64;
    if status >= 400 {
        warn!(%method, %path, status, duration_ms, "HTTP request failed");
    } else {
        info!(%method, %path, status, duration_ms, "HTTP request completed");
    }

    response
}
