//! todo-api バイナリのエントリポイント
//! Lambda 上では lambda_http で、ローカルでは axum::serve で起動します。

use lambda_http::Error;
use shared::{init_tracing, Config};
use std::net::SocketAddr;
use todo_api::{app, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = init_tracing() {
        eprintln!("トレーシング初期化エラー: {e}");
    }

    let config = Config::from_env()?;
    let router = app(AppState::from_config(&config).await);

    if std::env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Lambda runtime starting");
        return lambda_http::run(router).await;
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server starting");
    axum::serve(listener, router).await?;

    Ok(())
}
