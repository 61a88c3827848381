//! Scheduler port - タスク生成の抽象化

use crate::domain::{SchedulerError, TaskSpec};

/// 新しいタスクで実行されるエントリポイント
pub type TaskEntry = Box<dyn FnOnce() + Send + 'static>;

/// Scheduler は独立してスケジュールされるタスクを作る
///
/// # 契約
/// - `Ok(())` の場合、`entry` は新しいタスク上でちょうど 1 回実行される
/// - `Err(_)` の場合、`entry` は一度も実行されずに drop される
/// - `spec.priority` の解釈は実装に任される（パススルー）
pub trait Scheduler: Send + Sync {
    fn create_task(&self, spec: &TaskSpec, entry: TaskEntry) -> Result<(), SchedulerError>;
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn create_task(&self, spec: &TaskSpec, entry: TaskEntry) -> Result<(), SchedulerError> {
        (**self).create_task(spec, entry)
    }
}
