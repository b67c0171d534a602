use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{is_blank, Todo};
use tracing::info;

use crate::auth::AuthorisedUser;
use crate::error::ApiError;
use crate::AppState;

/// GET /todos
pub async fn list_todos(
    State(state): State<AppState>,
    AuthorisedUser(user_id): AuthorisedUser,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.repo.list(&user_id).await?;
    Ok(Json(todos))
}

/// POST /todos（ボディはラベル文字列そのもの）
///
/// ボディ全体が JSON 文字列リテラルとして読めれば引用符を外す。生テキストの `"quoted"` も `quoted` になる。
pub async fn create_todo(
    State(state): State<AppState>,
    AuthorisedUser(user_id): AuthorisedUser,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let raw = std::str::from_utf8(&body)
        .map_err(|_| ApiError::BadRequest("label is not valid UTF-8".to_string()))?;
    let label = label_from_body(raw);

    if is_blank(&label) {
        return Err(ApiError::BadRequest("label must not be blank".to_string()));
    }

    let todo = state.repo.add(&user_id, &label).await?;
    info!(user_id = %user_id, todo_id = %todo.id, "Todo created");
    Ok(Json(todo))
}

/// PUT /todos（Todo 全体で置き換え）
///
/// フィールド名は `id` / `label` / `complete` の完全一致で、大文字小文字は区別する。
pub async fn update_todo(
    State(state): State<AppState>,
    AuthorisedUser(user_id): AuthorisedUser,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let todo: Todo = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid todo JSON: {e}")))?;

    // 所有確認：呼び出し元の一覧に存在しない id は 404
    let owned = state.repo.list(&user_id).await?;
    if !owned.iter().any(|t| t.id == todo.id) {
        return Err(ApiError::NotFound(todo.id.to_string()));
    }

    state.repo.update(&user_id, &todo).await?;
    info!(user_id = %user_id, todo_id = %todo.id, "Todo updated");
    Ok(StatusCode::OK)
}

/// DELETE /todos/{id}（存在しなくても 204）
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthorisedUser(user_id): AuthorisedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if is_blank(&id) {
        return Err(ApiError::BadRequest("id must not be blank".to_string()));
    }

    state.repo.delete(&user_id, &id).await?;
    info!(user_id = %user_id, todo_id = %id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /todos/（id なし）
pub async fn delete_todo_without_id(_user: AuthorisedUser) -> ApiError {
    ApiError::BadRequest("id must not be blank".to_string())
}

/// JSON 文字列リテラルとして送られたラベルは展開し、それ以外は生テキストとして扱う
fn label_from_body(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string())
}
