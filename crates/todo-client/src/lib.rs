//! Todo API のクライアント側プロキシ
//!
//! 一度だけ取得するローカルキャッシュを持ち、ログイン済み（必要ロールあり）の
//! 場合のみネットワークを呼び出す。未ログインでも空の一覧を操作できる。

pub mod auth;
pub mod cache;
pub mod client;
pub mod error;

pub use auth::*;
pub use cache::*;
pub use client::*;
pub use error::*;
