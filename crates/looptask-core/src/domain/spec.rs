//! TaskSpec - ループタスクの生成パラメータ
//!
//! name / stack_size / priority はスケジューラへそのまま渡される。
//! JSON から読み込めるように Deserialize を実装している。

use serde::{Deserialize, Serialize};

use super::errors::SchedulerError;

/// デフォルトのスタックサイズ（64 KiB）
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

/// スケジューラ優先度（パススルー値）
///
/// 解釈はスケジューラ実装に任される。大きいほど優先。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Default for Priority {
    fn default() -> Self {
        Priority(5)
    }
}

/// A loop task's scheduling parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task name, visible to the scheduler (thread name) and in logs.
    pub name: String,

    #[serde(default = "default_stack_size")]
    pub stack_size: usize,

    #[serde(default)]
    pub priority: Priority,
}

fn default_stack_size() -> usize {
    DEFAULT_STACK_SIZE
}

impl TaskSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stack_size: DEFAULT_STACK_SIZE,
            priority: Priority::default(),
        }
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// スケジューラに渡す前の検証
    ///
    /// - name が空でなく NUL を含まないこと
    /// - stack_size が 0 でないこと
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.name.trim().is_empty() {
            return Err(SchedulerError::InvalidSpec("task name is empty".to_string()));
        }
        if self.name.contains('\0') {
            return Err(SchedulerError::InvalidSpec(format!(
                "task name contains NUL: {:?}",
                self.name
            )));
        }
        if self.stack_size == 0 {
            return Err(SchedulerError::InvalidSpec(format!(
                "stack_size must be non-zero (task={})",
                self.name
            )));
        }
        Ok(())
    }
}
