//! t32api のエントリポイント

use std::ffi::CStr;

/// 成功を表すステータス
pub const T32_OK: i32 = 0;

/// T32_Attach のデバイス指定 (ICD)
pub const T32_DEV_ICD: i32 = 1;

/// T32_GetMessage / T32_EvalGetString の受信バッファ長
pub const MESSAGE_BUFFER_LEN: usize = 256;

/// t32api のエントリポイント
///
/// 各メソッドはベンダーAPIの戻り値をそのまま返します（0が成功）。
/// `T32Library` が実際の共有ライブラリに対する実装です。
pub trait T32Api {
    /// T32_Config
    fn config(&self, key: &CStr, value: &CStr) -> i32;
    /// T32_Init
    fn init(&self) -> i32;
    /// T32_Exit
    fn exit(&self) -> i32;
    /// T32_Attach
    fn attach(&self, device: i32) -> i32;
    /// T32_Cmd
    fn cmd(&self, command: &CStr) -> i32;
    /// T32_GetPracticeState
    fn get_practice_state(&self, state: &mut i32) -> i32;
    /// T32_GetMessage
    fn get_message(&self, buffer: &mut [u8; MESSAGE_BUFFER_LEN], mode: &mut u16) -> i32;
    /// T32_EvalGetString
    fn eval_get_string(&self, buffer: &mut [u8; MESSAGE_BUFFER_LEN]) -> i32;
}

/// NUL終端のバッファを文字列に変換する
pub fn decode_buffer(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}
