//! TRACE32 リモート制御のコア機能
//!
//! このクレートは、トランスポートに依存しない共通部分を提供します。
//! ECHO 応答の型変換、メッセージモード、エラー型、各トランスポートが実装する
//! インターフェース、およびコマンドラインのサブコマンド実行ロジックを含みます。

pub mod command;
pub mod echo;
pub mod errors;
pub mod interface;
pub mod message;

pub use command::Command;
pub use echo::{parse_echo, EchoValue};
pub use errors::T32Error;
pub use interface::T32Interface;
pub use message::{format_message, MessageMode, PracticeState};

/// インストールルートを指す環境変数名
pub const T32SYS_ENV: &str = "T32SYS";

/// コア機能の結果型
pub type Result<T> = std::result::Result<T, T32Error>;

/// 環境変数 T32SYS からインストールルートを取得する
pub fn t32sys() -> Result<std::path::PathBuf> {
    std::env::var_os(T32SYS_ENV)
        .map(std::path::PathBuf::from)
        .ok_or(T32Error::MissingInstallRoot)
}
