//! エラー型

use crate::EchoValue;
use std::path::PathBuf;
use std::process::ExitStatus;

/// TRACE32 操作のエラー
#[derive(Debug, thiserror::Error)]
pub enum T32Error {
    /// T32SYS 環境変数が設定されていない
    #[error("Missing T32SYS environment variable")]
    MissingInstallRoot,

    /// t32api ライブラリが見つからない
    #[error("Unable to find t32api library (searched: {searched:?})")]
    LibraryNotFound { searched: Vec<PathBuf> },

    /// t32api ライブラリの読み込みに失敗
    #[error("Failed to load t32api library {path:?}: {message}")]
    LibraryLoad { path: PathBuf, message: String },

    /// 接続がオープンされていない
    #[error("T32 connection is not open")]
    NotOpen,

    /// ベンダーAPIが0以外のステータスを返した
    #[error("Failed {call} error {code}")]
    Api { call: &'static str, code: i32 },

    /// T32_Cmd が0以外のステータスを返した
    #[error("T32_Cmd error {code} on {command}")]
    Command { command: String, code: i32 },

    /// ECHO の応答が Temporary Information ではなかった
    #[error("ECHO returned unexpected msgmode 0x{0:x}")]
    UnexpectedMessageMode(u16),

    /// リモートコマンドの出力を解釈できない
    #[error("Failed to parse t32rem output {0:?}")]
    UnparsableOutput(String),

    /// リモートコマンドが失敗ステータスで終了した
    #[error("{command} failed with {status}")]
    RemoteCommandFailed { command: String, status: ExitStatus },

    /// ERROR.ID() が設定されていた
    #[error("T32 Error {0}")]
    Reported(EchoValue),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl T32Error {
    /// 「見つからない」系のエラーかどうか
    ///
    /// 呼び出し側はこれを「機能が利用できない」として扱い、
    /// テストをスキップするなどの判断に使えます。
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            T32Error::LibraryNotFound { .. } | T32Error::MissingInstallRoot
        )
    }
}
