//! t32api 共有ライブラリを使った TRACE32 トランスポート
//!
//! ベンダー提供の t32api ライブラリを動的に読み込み、
//! 接続の確立・切断、コマンド送信、PRACTICE 実行状態のポーリング、
//! 応答メッセージの取得を行います。

pub mod api;
pub mod connection;
pub mod library;

pub use api::T32Api;
pub use connection::{ApiConfig, ApiInterface, WaitOutcome};
pub use library::{find_library, find_library_in, library_name, T32Library};

pub use t32_core::{Result, T32Error};
