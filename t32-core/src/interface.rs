//! トランスポート共通のインターフェース

use crate::{EchoValue, Result, T32Error};

/// TRACE32 を操作するトランスポートが実装するトレイト
///
/// `run` と `echo` が基本操作で、エラー関連の補助操作はそれらの上に
/// 一度だけ実装されています。
pub trait T32Interface {
    /// TRACE32 コマンドを実行する
    ///
    /// `args` は空白で連結されて1つのコマンドになります。
    fn run(&mut self, args: &[&str]) -> Result<()>;

    /// 式を評価し、結果を型付きの値で返す
    fn echo(&mut self, expression: &str) -> Result<EchoValue>;

    /// 実行中のPRACTICEスクリプトが終わるまで待つ
    fn wait(&mut self) -> Result<()>;

    /// コマンドを送ってから実行完了を待つ
    fn dowait(&mut self, args: &[&str]) -> Result<()> {
        self.run(args)?;
        self.wait()
    }

    /// エラー状態をリセットする
    fn error_reset(&mut self) -> Result<()> {
        self.run(&["ERROR.RESet"])
    }

    /// エラーが発生しているかどうか
    fn error_occurred(&mut self) -> Result<bool> {
        Ok(self.echo("ERROR.OCCURRED()")?.is_set())
    }

    /// 現在のエラーIDを取得する
    fn error_id(&mut self) -> Result<EchoValue> {
        self.echo("ERROR.ID()")
    }

    /// エラーIDが設定されていればエラーとして返す
    fn raise_error_id(&mut self) -> Result<()> {
        let id = self.error_id()?;
        if id.is_set() {
            return Err(T32Error::Reported(id));
        }
        Ok(())
    }
}

impl<T: T32Interface + ?Sized> T32Interface for Box<T> {
    fn run(&mut self, args: &[&str]) -> Result<()> {
        (**self).run(args)
    }

    fn echo(&mut self, expression: &str) -> Result<EchoValue> {
        (**self).echo(expression)
    }

    fn wait(&mut self) -> Result<()> {
        (**self).wait()
    }

    fn dowait(&mut self, args: &[&str]) -> Result<()> {
        (**self).dowait(args)
    }
}
