//! Errors - 回復可能なエラーと致命的エラーの入力
//!
//! # 分類
//! - 生成失敗（SchedulerError / SpawnError）: spawn から同期的に返る。回復可能
//! - ヘルスチェック失敗（HealthError）: 監督側では致命的。abort する
//! - 契約違反（不正な disposition, step の panic）: エラー型を持たず abort する

use std::fmt;

use thiserror::Error;

/// スケジューラがタスクを作れなかった
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("failed to spawn task: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("scheduler rejected task: {0}")]
    Rejected(String),

    #[error("invalid task spec: {0}")]
    InvalidSpec(String),
}

/// ヘルスチェックの失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthError {
    #[error("health check failed: {0}")]
    Failed(String),
}

/// SpawnError は生成失敗と、呼び出し側に返却される context
///
/// spawn が失敗した場合 context の所有権は移らない。
/// `into_context()` で呼び出し側が取り戻す。
pub struct SpawnError<C> {
    context: C,
    source: SchedulerError,
}

impl<C> SpawnError<C> {
    pub(crate) fn new(context: C, source: SchedulerError) -> Self {
        Self { context, source }
    }

    /// 失敗の原因
    pub fn scheduler_error(&self) -> &SchedulerError {
        &self.source
    }

    /// context を取り戻す
    pub fn into_context(self) -> C {
        self.context
    }

    pub fn into_parts(self) -> (C, SchedulerError) {
        (self.context, self.source)
    }
}

// context は任意の型なので Debug 出力には含めない
impl<C> fmt::Debug for SpawnError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<C> fmt::Display for SpawnError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to create loop task: {}", self.source)
    }
}

impl<C> std::error::Error for SpawnError<C> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
