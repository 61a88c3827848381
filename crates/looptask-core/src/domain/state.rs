//! State - 制御ブロックの状態遷移
//!
//! ```text
//! Running --request_stop--> Stopping --loop exits--> Stopped --join--> (freed)
//! Running --step returns Stop--------------------> Stopped
//! ```

use serde::{Deserialize, Serialize};

/// LoopState は 1 つの制御ブロックの状態
///
/// 2 つのフラグ（停止要求・完了）から導出される。どちらも単調で、一度立ったら戻らない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// spawn 成功後、停止要求なし
    Running,
    /// 停止要求済み、ループはまだ現在の反復を実行中
    Stopping,
    /// 完了フラグが立った（終端）
    Stopped,
}

impl LoopState {
    pub(crate) fn from_flags(stop_requested: bool, completed: bool) -> Self {
        match (stop_requested, completed) {
            (_, true) => LoopState::Stopped,
            (true, false) => LoopState::Stopping,
            (false, false) => LoopState::Running,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == LoopState::Stopped
    }
}

/// ExitReason はループが反復サイクルを抜けた経路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// 反復の先頭で停止要求を観測した
    StopRequested,
    /// step が `Disposition::Stop` を返した
    StepFinished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::running(false, false, LoopState::Running)]
    #[case::stopping(true, false, LoopState::Stopping)]
    #[case::stopped_after_request(true, true, LoopState::Stopped)]
    #[case::stopped_by_step(false, true, LoopState::Stopped)]
    fn state_is_derived_from_flags(
        #[case] stop_requested: bool,
        #[case] completed: bool,
        #[case] expected: LoopState,
    ) {
        assert_eq!(LoopState::from_flags(stop_requested, completed), expected);
    }

    #[test]
    fn only_stopped_is_terminal() {
        assert!(!LoopState::Running.is_terminal());
        assert!(!LoopState::Stopping.is_terminal());
        assert!(LoopState::Stopped.is_terminal());
    }
}
