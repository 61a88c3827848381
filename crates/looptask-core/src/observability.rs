//! Tracing の初期化
//!
//! ライブラリ自体は `tracing` のマクロでログを出すだけ。
//! バイナリやテストは `init_tracing()` で購読者を入れる。

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `RUST_LOG` が無いときのフィルタ
pub const DEFAULT_FILTER: &str = "looptask_core=debug,looptask_cli=debug";

/// fmt レイヤーの購読者を設定する
///
/// 2 回目以降の呼び出しは何もしない（テストから何度呼んでもよい）。
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("tracing initialised twice");
    }
}
