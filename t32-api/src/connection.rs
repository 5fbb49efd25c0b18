//! t32api による接続とコマンド実行

use crate::api::{decode_buffer, T32Api, MESSAGE_BUFFER_LEN, T32_DEV_ICD, T32_OK};
use crate::library::T32Library;
use std::ffi::CString;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use t32_core::{
    format_message, parse_echo, EchoValue, MessageMode, PracticeState, Result, T32Error,
    T32Interface,
};

/// 接続設定
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// TRACE32 が動作しているホスト
    pub node: String,
    /// リモートAPIのポート
    pub port: u16,
    /// パケット長
    pub packlen: u32,
    /// T32_GetPracticeState のポーリング間隔
    pub poll_interval: Duration,
    /// ライブラリのパス（None なら T32SYS から探す）
    pub library_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            node: "127.0.0.1".to_string(),
            port: 20000,
            packlen: 1024,
            poll_interval: Duration::from_millis(50),
            library_path: None,
        }
    }
}

/// `wait_for_idle` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// PRACTICE が NOT_RUNNING になった
    Idle,
    /// T32_GetPracticeState が失敗したため待機を打ち切った
    ///
    /// ターゲットはまだ実行中かもしれません。
    PollFailed(i32),
}

/// t32api を使った TRACE32 インターフェース
///
/// 作成時に接続をオープンします。`close` で明示的に切断してください。
/// オープンのまま破棄された場合は警告を出して切断を試みます。
pub struct ApiInterface<A: T32Api = T32Library> {
    api: A,
    config: ApiConfig,
    is_open: bool,
}

impl ApiInterface<T32Library> {
    /// ライブラリを読み込んで接続する
    pub fn new(config: ApiConfig) -> Result<Self> {
        let library = match &config.library_path {
            Some(path) => T32Library::load(path)?,
            None => T32Library::discover()?,
        };
        Self::with_api(library, config)
    }

    /// 接続してクロージャを実行し、必ず切断する
    pub fn session<R>(config: ApiConfig, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        Self::new(config)?.scoped(f)
    }
}

impl<A: T32Api> ApiInterface<A> {
    /// 任意のエントリポイント実装で接続する
    pub fn with_api(api: A, config: ApiConfig) -> Result<Self> {
        let mut t32 = Self {
            api,
            config,
            is_open: false,
        };
        t32.open()?;
        Ok(t32)
    }

    /// クロージャを実行してから切断する
    ///
    /// クロージャのエラーを優先して返します。
    pub fn scoped<R>(mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let result = f(&mut self);
        let closed = self.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// 接続をオープンする (T32_Config + T32_Init)
    ///
    /// 既にオープンしている場合は何もしません。
    pub fn open(&mut self) -> Result<()> {
        if self.is_open {
            return Ok(());
        }

        tracing::debug!("T32_Config...");
        self.config_value("NODE=", &self.config.node)?;
        self.config_value("PORT=", &self.config.port.to_string())?;
        self.config_value("PACKLEN=", &self.config.packlen.to_string())?;

        tracing::debug!("T32_Init...");
        let err = self.api.init();
        if err != T32_OK {
            return Err(T32Error::Api { call: "T32_Init", code: err });
        }

        self.is_open = true;
        Ok(())
    }

    /// 接続をクローズする (T32_Exit)
    ///
    /// オープンしていない場合は何もしません。
    pub fn close(&mut self) -> Result<()> {
        if !self.is_open {
            return Ok(());
        }

        tracing::debug!("T32_Exit");
        let err = self.api.exit();
        if err != T32_OK {
            return Err(T32Error::Api { call: "T32_Exit", code: err });
        }

        self.is_open = false;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// エントリポイント実装への参照
    pub fn api(&self) -> &A {
        &self.api
    }

    /// デバッガにアタッチする (T32_Attach)
    pub fn attach(&self) -> Result<()> {
        self.require_open()?;
        let err = self.api.attach(T32_DEV_ICD);
        if err != T32_OK {
            return Err(T32Error::Api { call: "T32_Attach", code: err });
        }
        Ok(())
    }

    /// 待機せずにコマンドを送信する (T32_Cmd)
    pub fn cmd(&self, args: &[&str]) -> Result<()> {
        self.require_open()?;
        let command = args.join(" ");
        tracing::info!("T32_Cmd {}", command);

        let raw = to_cstring(&command)?;
        let err = self.api.cmd(&raw);
        if err != T32_OK {
            return Err(T32Error::Command { command, code: err });
        }
        Ok(())
    }

    /// コマンドを実行する
    ///
    /// 既定の `run` は送信の前後両方で待機します。
    pub fn run_with(&mut self, args: &[&str], wait_before: bool, wait_after: bool) -> Result<()> {
        if wait_before {
            self.wait()?;
        }
        self.cmd(args)?;
        if wait_after {
            self.wait()?;
        }
        Ok(())
    }

    /// PRACTICE の実行状態が NOT_RUNNING になるまでポーリングする
    ///
    /// T32_GetPracticeState が失敗した時点でも待機を終了し、
    /// `WaitOutcome::PollFailed` を返します。
    pub fn wait_for_idle(&self) -> Result<WaitOutcome> {
        self.require_open()?;

        let mut state = PracticeState::Unknown.raw();
        loop {
            thread::sleep(self.config.poll_interval);
            let rc = self.api.get_practice_state(&mut state);
            if rc != T32_OK {
                return Ok(WaitOutcome::PollFailed(rc));
            }
            if PracticeState::from(state) == PracticeState::NotRunning {
                return Ok(WaitOutcome::Idle);
            }
        }
    }

    /// `EVAL` で式を評価し、結果を文字列のまま返す
    pub fn eval_string(&self, expression: &str) -> Result<String> {
        self.cmd(&["EVAL", expression])?;

        let mut buffer = [0u8; MESSAGE_BUFFER_LEN];
        let ret = self.api.eval_get_string(&mut buffer);
        if ret < 0 {
            return Err(T32Error::Api { call: "T32_EvalGetString", code: ret });
        }
        Ok(decode_buffer(&buffer))
    }

    fn config_value(&self, key: &str, value: &str) -> Result<()> {
        let err = self.api.config(&to_cstring(key)?, &to_cstring(value)?);
        if err != T32_OK {
            return Err(T32Error::Api { call: "T32_Config", code: err });
        }
        Ok(())
    }

    fn require_open(&self) -> Result<()> {
        if !self.is_open {
            return Err(T32Error::NotOpen);
        }
        Ok(())
    }
}

impl<A: T32Api> T32Interface for ApiInterface<A> {
    fn run(&mut self, args: &[&str]) -> Result<()> {
        self.run_with(args, true, true)
    }

    fn echo(&mut self, expression: &str) -> Result<EchoValue> {
        self.cmd(&["ECHO", expression])?;

        let mut buffer = [0u8; MESSAGE_BUFFER_LEN];
        let mut raw_mode = 0u16;
        let ret = self.api.get_message(&mut buffer, &mut raw_mode);
        if ret < 0 {
            return Err(T32Error::Api { call: "T32_GetMessage", code: ret });
        }

        let msg = decode_buffer(&buffer);
        let mode = MessageMode::from_bits_retain(raw_mode);
        tracing::info!("{}", format_message(mode, &msg));

        if mode != MessageMode::TEMP_INFO {
            return Err(T32Error::UnexpectedMessageMode(raw_mode));
        }
        Ok(parse_echo(&msg))
    }

    fn wait(&mut self) -> Result<()> {
        if let WaitOutcome::PollFailed(code) = self.wait_for_idle()? {
            tracing::warn!("T32_GetPracticeState error {}, stopped waiting", code);
        }
        Ok(())
    }

    fn dowait(&mut self, args: &[&str]) -> Result<()> {
        self.cmd(args)?;
        self.wait()
    }
}

impl<A: T32Api> Drop for ApiInterface<A> {
    fn drop(&mut self) {
        if self.is_open {
            tracing::warn!("closing t32 from destructor");
            if let Err(e) = self.close() {
                tracing::warn!("failed to close t32: {}", e);
            }
        }
    }
}

fn to_cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|e| T32Error::Io(io::Error::new(io::ErrorKind::InvalidInput, e)))
}
