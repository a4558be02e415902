use tracing_subscriber::EnvFilter;

/// ログ出力を初期化する（標準エラー出力）
///
/// RUST_LOG が設定されていればそれを優先し、なければ
/// `--verbose` で debug、それ以外は `--log-level` を使う。
pub fn init(verbose: bool, log_level: &str) {
    let default_level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // テストなどで二重に初期化された場合は無視
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
