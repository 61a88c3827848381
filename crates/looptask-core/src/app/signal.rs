//! LoopSignal - 停止要求と完了の 2 フラグ
//!
//! # 学習ポイント
//! - 停止要求: AtomicBool。セットも確認もブロックしない
//! - 完了: Mutex<bool> + Condvar。join 側がブロックして待つ
//! - どちらのフラグも単調（一度立ったら戻らない）

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

use crate::domain::LoopState;

/// LoopSignal は 1 つの制御ブロックに属する同期オブジェクト
///
/// ループタスクと、spawn/stop/join を呼ぶ側のタスクの間で共有されるのはこれだけ。
#[derive(Debug, Default)]
pub struct LoopSignal {
    stop_requested: AtomicBool,
    completed: Mutex<bool>,
    completed_cv: Condvar,
    /// join が context を取り出した後に立つ
    released: AtomicBool,
}

impl LoopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 停止要求フラグを立てる（非ブロッキング・冪等）
    ///
    /// このフラグを最初に立てた呼び出しだけが `true` を返す。
    pub fn request_stop(&self) -> bool {
        !self.stop_requested.swap(true, Ordering::AcqRel)
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// 完了フラグを立て、待っている join を起こす
    ///
    /// ループ自身が、反復サイクルを恒久的に抜けた後に 1 回だけ呼ぶ。
    pub(crate) fn mark_completed(&self) {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        debug_assert!(!*completed, "completion flag set twice");
        *completed = true;
        self.completed_cv.notify_all();
    }

    pub fn is_completed(&self) -> bool {
        *self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// 完了フラグが立つまでブロックする（タイムアウトなし）
    pub fn wait_completed(&self) {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while !*completed {
            completed = self
                .completed_cv
                .wait(completed)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn mark_released(&self) {
        self.released.store(true, Ordering::Release);
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// 現在の状態（Running / Stopping / Stopped）
    pub fn state(&self) -> LoopState {
        LoopState::from_flags(self.is_stop_requested(), self.is_completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn new_signal_is_running() {
        let signal = LoopSignal::new();
        assert!(!signal.is_stop_requested());
        assert!(!signal.is_completed());
        assert_eq!(signal.state(), LoopState::Running);
    }

    #[test]
    fn request_stop_is_idempotent() {
        let signal = LoopSignal::new();
        assert!(signal.request_stop());
        assert!(!signal.request_stop());
        assert!(!signal.request_stop());
        assert!(signal.is_stop_requested());
        assert_eq!(signal.state(), LoopState::Stopping);
    }

    #[test]
    fn completion_without_stop_request_is_stopped() {
        let signal = LoopSignal::new();
        signal.mark_completed();
        assert_eq!(signal.state(), LoopState::Stopped);
    }

    #[test]
    fn wait_completed_blocks_until_marked() {
        let signal = Arc::new(LoopSignal::new());
        let (tx, rx) = mpsc::channel();

        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                signal.wait_completed();
                tx.send(()).unwrap();
            })
        };

        // まだ完了していないので waiter は戻らない
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

        signal.mark_completed();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn wait_completed_returns_immediately_when_already_set() {
        let signal = LoopSignal::new();
        signal.mark_completed();
        signal.wait_completed();
        assert!(signal.is_completed());
    }
}
