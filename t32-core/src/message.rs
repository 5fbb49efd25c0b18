//! メッセージモードとPRACTICE実行状態

use bitflags::bitflags;

bitflags! {
    /// T32_GetMessage が返すメッセージ種別
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MessageMode: u16 {
        const INFO       = 0x01;
        const ERROR      = 0x02;
        const STATE      = 0x04;
        const WARN_INFO  = 0x08;
        const ERROR_INFO = 0x10;
        const TEMP       = 0x20;
        const TEMP_INFO  = 0x40;
    }
}

/// T32_GetPracticeState が返すPRACTICEスクリプトの実行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeState {
    Unknown,
    NotRunning,
    Running,
    DialogOpen,
}

impl From<i32> for PracticeState {
    fn from(raw: i32) -> Self {
        match raw {
            0 => PracticeState::NotRunning,
            1 => PracticeState::Running,
            2 => PracticeState::DialogOpen,
            _ => PracticeState::Unknown,
        }
    }
}

impl PracticeState {
    /// ベンダーAPIでの値
    pub fn raw(self) -> i32 {
        match self {
            PracticeState::Unknown => -1,
            PracticeState::NotRunning => 0,
            PracticeState::Running => 1,
            PracticeState::DialogOpen => 2,
        }
    }
}

/// 応答メッセージを人が読める形に整形する
///
/// t32rem が標準出力に書く形式と同じです。
/// ```
/// use t32_core::message::{format_message, MessageMode};
///
/// assert_eq!(
///     format_message(MessageMode::TEMP_INFO, "2."),
///     "command returned Temporary Information, message: 2."
/// );
/// ```
pub fn format_message(mode: MessageMode, msg: &str) -> String {
    // STATE は表示しない
    const LABELS: [(MessageMode, &str); 6] = [
        (MessageMode::INFO, "General Information"),
        (MessageMode::ERROR, "Error"),
        (MessageMode::WARN_INFO, "Status Information"),
        (MessageMode::ERROR_INFO, "Error Information"),
        (MessageMode::TEMP, "Temporary Display"),
        (MessageMode::TEMP_INFO, "Temporary Information"),
    ];

    let mut result = String::from("command returned ");
    for (flag, label) in LABELS {
        if mode.contains(flag) {
            result.push_str(label);
            result.push_str(", ");
        }
    }
    result.push_str("message: ");
    result.push_str(msg);
    result
}
