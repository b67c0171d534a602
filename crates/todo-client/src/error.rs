use domain::TodoId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// ローカルキャッシュに存在しない Todo を更新しようとした
    #[error("Cannot find Todo with id {0}")]
    UnknownTodo(TodoId),
}
