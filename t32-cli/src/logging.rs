//! ログ出力の設定

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// stderr へのログ出力を設定する
///
/// `-v` が指定されなければ `RUST_LOG`（既定は WARN）に従います。
/// 標準出力はコマンドの出力専用です。
pub fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
        1 => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(""),
        _ => EnvFilter::builder()
            .with_default_directive(LevelFilter::DEBUG.into())
            .parse_lossy(""),
    };

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
