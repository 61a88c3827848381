//! 致命的エラーの経路
//!
//! 契約違反（不正な disposition, step の panic）とヘルスチェック失敗は回復しない。
//! ログを出してプロセスを abort する。

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

use crate::domain::LoopId;

pub(crate) fn fatal(reason: fmt::Arguments<'_>) -> ! {
    error!("fatal: {reason}");
    eprintln!("looptask: fatal: {reason}");
    std::process::abort()
}

/// ループタスク上で外部の処理（step, ヘルスチェック, 時計）を呼ぶ
///
/// panic がループタスクの外へ巻き戻ると完了フラグが立たず join が戻らなくなる。
/// そのため panic は fatal として扱う。
pub(crate) fn abort_on_panic<T>(what: &str, loop_id: LoopId, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => fatal(format_args!(
            "{what} of {loop_id} panicked: {}",
            panic_message(payload.as_ref())
        )),
    }
}

/// panic ペイロードから表示用メッセージを取り出す
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// abort する経路のテスト補助
///
/// abort はテストプロセスごと落とすので、テストバイナリを子プロセスとして
/// 1 テストだけ再実行し、その終了状態を見る。
#[cfg(test)]
pub(crate) mod child {
    use std::process::{Command, ExitStatus};

    const CHILD_ENV: &str = "LOOPTASK_ABORT_CHILD";

    /// `module_path!()` とテスト関数名からテストバイナリ内のテスト名を作る
    pub(crate) fn test_name(module: &str, function: &str) -> String {
        let module = module
            .strip_prefix(concat!(env!("CARGO_CRATE_NAME"), "::"))
            .unwrap_or(module);
        format!("{module}::{function}")
    }

    /// このプロセスが `name` を実行する子プロセスなら true
    pub(crate) fn is_child(name: &str) -> bool {
        std::env::var(CHILD_ENV).as_deref() == Ok(name)
    }

    /// `name` のテストだけを子プロセスで実行し、abort したことを確認する
    pub(crate) fn assert_aborts(name: &str) {
        let status = Command::new(std::env::current_exe().unwrap())
            .args([name, "--exact", "--nocapture", "--test-threads=1"])
            .env(CHILD_ENV, name)
            .status()
            .unwrap();
        assert_aborted(status, name);
    }

    #[cfg(unix)]
    fn assert_aborted(status: ExitStatus, name: &str) {
        use std::os::unix::process::ExitStatusExt;

        const SIGABRT: i32 = 6;
        assert!(!status.success(), "{name} exited normally: {status}");
        assert_eq!(status.signal(), Some(SIGABRT), "{name} did not abort: {status}");
    }

    #[cfg(not(unix))]
    fn assert_aborted(status: ExitStatus, name: &str) {
        assert!(!status.success(), "{name} exited normally: {status}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_handles_common_payloads() {
        let payload = std::panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let n = 3;
        let payload = std::panic::catch_unwind(|| panic!("boom {n}")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 3");

        let payload = std::panic::catch_unwind(|| std::panic::panic_any(42_u32)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic payload>");
    }

    #[test]
    fn abort_on_panic_passes_values_through() {
        assert_eq!(abort_on_panic("clock", LoopId::generate(), || 41 + 1), 42);
    }

    #[test]
    fn abort_on_panic_aborts_on_panic() {
        let name = child::test_name(module_path!(), "abort_on_panic_aborts_on_panic");
        if child::is_child(&name) {
            abort_on_panic("clock", LoopId::generate(), || -> u8 { panic!("clock went backwards") });
            return;
        }
        child::assert_aborts(&name);
    }

    #[test]
    fn test_name_strips_crate_prefix() {
        assert_eq!(
            child::test_name("looptask_core::app::fatal::tests", "t"),
            "app::fatal::tests::t"
        );
    }
}
