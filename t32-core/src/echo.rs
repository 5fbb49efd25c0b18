//! ECHO 応答の型変換

use std::fmt;

/// ECHO 応答を変換した値
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EchoValue {
    /// `TRUE()` / `FALSE()`
    Bool(bool),
    /// `0x` で始まる16進数、または `.` で終わる10進数
    Int(i128),
    /// それ以外の応答はそのまま
    String(String),
}

impl EchoValue {
    /// エラーIDなどが「設定されている」とみなせるかどうか
    ///
    /// 空文字列、0、`FALSE()` は未設定として扱います。
    pub fn is_set(&self) -> bool {
        match self {
            EchoValue::Bool(b) => *b,
            EchoValue::Int(n) => *n != 0,
            EchoValue::String(s) => !s.is_empty(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EchoValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            EchoValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EchoValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for EchoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EchoValue::Bool(true) => f.write_str("True"),
            EchoValue::Bool(false) => f.write_str("False"),
            EchoValue::Int(n) => write!(f, "{}", n),
            EchoValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for EchoValue {
    fn from(b: bool) -> Self {
        EchoValue::Bool(b)
    }
}

impl From<i128> for EchoValue {
    fn from(n: i128) -> Self {
        EchoValue::Int(n)
    }
}

impl From<&str> for EchoValue {
    fn from(s: &str) -> Self {
        EchoValue::String(s.to_string())
    }
}

/// ECHO が返した文字列を型付きの値に変換する
///
/// 16進数は `0x` プレフィックス、10進数は末尾の `.` で判定します。
/// 数値として解釈できなかった場合は文字列のまま返すため、失敗しません。
///
/// # Examples
/// ```
/// use t32_core::echo::{parse_echo, EchoValue};
///
/// assert_eq!(parse_echo("123."), EchoValue::Int(123));
/// assert_eq!(parse_echo("0x42"), EchoValue::Int(0x42));
/// assert_eq!(parse_echo("FALSE()"), EchoValue::Bool(false));
/// ```
pub fn parse_echo(val: &str) -> EchoValue {
    if val == "TRUE()" {
        return EchoValue::Bool(true);
    }
    if val == "FALSE()" {
        return EchoValue::Bool(false);
    }

    let parsed = if let Some(hex) = val.strip_prefix("0x") {
        if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            i128::from_str_radix(hex, 16).ok()
        } else {
            None
        }
    } else if let Some(dec) = val.strip_suffix('.') {
        dec.parse::<i128>().ok()
    } else {
        None
    };

    match parsed {
        Some(n) => EchoValue::Int(n),
        None => EchoValue::String(val.to_string()),
    }
}
