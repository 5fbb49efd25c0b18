//! t32rem コマンドを使った TRACE32 トランスポート
//!
//! 呼び出しごとにベンダー提供の t32rem を1回起動し、
//! その終了ステータスと標準出力から結果を得ます。

use std::io;
use std::process::{Command, Output, Stdio};
use t32_core::{parse_echo, EchoValue, Result, T32Error, T32Interface};

/// ECHO の成功時に t32rem が出力する接頭辞
pub const TEMP_INFO_PREFIX: &str = "command returned Temporary Information, message: ";

/// t32rem の設定
#[derive(Debug, Clone)]
pub struct RemConfig {
    /// 実行するコマンド（プログラムと追加引数）
    pub command: Vec<String>,
    /// TRACE32 が動作しているホスト
    pub host: String,
}

impl Default for RemConfig {
    fn default() -> Self {
        Self {
            command: vec!["t32rem".to_string()],
            host: "localhost".to_string(),
        }
    }
}

/// t32rem を使った TRACE32 インターフェース
pub struct RemInterface {
    config: RemConfig,
}

impl RemInterface {
    pub fn new(config: RemConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RemConfig {
        &self.config
    }

    /// `<command...> <host> <args...>` を実行する
    ///
    /// `capture` が真なら標準出力と標準エラーを取得します。
    /// `check` が真なら失敗ステータスをエラーにします。
    pub fn run_with(&self, args: &[&str], capture: bool, check: bool) -> Result<Output> {
        let (program, extra) = self.config.command.split_first().ok_or_else(|| {
            T32Error::Io(io::Error::new(io::ErrorKind::InvalidInput, "empty t32rem command"))
        })?;

        let mut cmd = Command::new(program);
        cmd.args(extra).arg(&self.config.host).args(args);
        tracing::info!("RUN: {:?}", cmd);

        let output = if capture {
            cmd.stdin(Stdio::null()).output()?
        } else {
            let status = cmd.status()?;
            Output {
                status,
                stdout: Vec::new(),
                stderr: Vec::new(),
            }
        };

        if !output.stderr.is_empty() {
            tracing::debug!("t32rem stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        if check && !output.status.success() {
            return Err(T32Error::RemoteCommandFailed {
                command: self.describe(args),
                status: output.status,
            });
        }
        Ok(output)
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts: Vec<&str> = self.config.command.iter().map(String::as_str).collect();
        parts.push(&self.config.host);
        parts.extend_from_slice(args);
        parts.join(" ")
    }
}

impl Default for RemInterface {
    fn default() -> Self {
        Self::new(RemConfig::default())
    }
}

/// ECHO の出力から値の部分を取り出す
pub fn parse_echo_output(stdout: &str) -> Result<EchoValue> {
    match stdout.strip_prefix(TEMP_INFO_PREFIX) {
        Some(value) => Ok(parse_echo(value.trim_end_matches(['\r', '\n']))),
        None => Err(T32Error::UnparsableOutput(stdout.to_string())),
    }
}

impl T32Interface for RemInterface {
    fn run(&mut self, args: &[&str]) -> Result<()> {
        self.run_with(args, false, true)?;
        Ok(())
    }

    fn echo(&mut self, expression: &str) -> Result<EchoValue> {
        let output = self.run_with(&["ECHO", expression], true, true)?;
        parse_echo_output(&String::from_utf8_lossy(&output.stdout))
    }

    fn wait(&mut self) -> Result<()> {
        // t32rem には PRACTICE 状態を問い合わせる手段がない
        tracing::debug!("t32rem cannot query practice state, not waiting");
        Ok(())
    }
}
