//! サブコマンドとその実行

use crate::{Result, T32Interface};
use std::fs::File;
use std::io::{self, Write};

/// AREA 名が省略された場合の既定値
pub const DEFAULT_AREA: &str = "A000";

/// サブコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// コマンドを実行し、実行完了まで待つ
    Run(Vec<String>),
    /// 式を評価して結果を出力
    Echo(String),
    /// 実行中のコマンドが終わるまで待つ
    Wait,
    /// ウィンドウの内容を出力 (`WinPrint.<window> <args...>`)
    WinPrint { window: String, args: Vec<String> },
    /// AREA の内容を出力
    AreaCat(String),
}

impl Command {
    /// トランスポートに対してコマンドを実行し、結果を `out` に書き出す
    pub fn execute<T: T32Interface + ?Sized>(
        &self,
        t32: &mut T,
        out: &mut dyn Write,
    ) -> Result<()> {
        tracing::debug!("Executing {:?}", self);
        match self {
            Command::Run(cmd) => {
                let args: Vec<&str> = cmd.iter().map(String::as_str).collect();
                t32.run(&args)?;
            }
            Command::Echo(expr) => {
                let value = t32.echo(expr)?;
                write!(out, "{}", value)?;
            }
            Command::Wait => t32.wait()?,
            Command::WinPrint { window, args } => {
                let tmp = tempfile::Builder::new()
                    .suffix(".t32.winprint.txt")
                    .tempfile()?;
                let path = tmp.path().to_string_lossy().into_owned();

                // プリンタ出力を一時ファイルに向けてから印刷する
                t32.run(&["PRinTer.FILE", path.as_str(), "/Append"])?;
                let winprint = format!("WinPrint.{}", window);
                let mut cmd = vec![winprint.as_str()];
                cmd.extend(args.iter().map(String::as_str));
                t32.run(&cmd)?;

                io::copy(&mut File::open(tmp.path())?, out)?;
            }
            Command::AreaCat(area) => {
                let tmp = tempfile::Builder::new()
                    .suffix(".t32.areasave.txt")
                    .tempfile()?;
                let path = tmp.path().to_string_lossy().into_owned();

                t32.dowait(&["AREA.SAVE", area.as_str(), path.as_str()])?;

                io::copy(&mut File::open(tmp.path())?, out)?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
