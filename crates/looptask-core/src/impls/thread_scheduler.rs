//! ThreadScheduler - OS スレッドによる Scheduler 実装
//!
//! - name → スレッド名
//! - stack_size → `std::thread::Builder::stack_size`（OS の最小値に切り上げられる）
//! - priority → 記録のみ。std には移植可能な優先度 API がない

use std::thread;

use tracing::{debug, error};

use crate::domain::{SchedulerError, TaskSpec};
use crate::ports::{Scheduler, TaskEntry};

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl ThreadScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for ThreadScheduler {
    fn create_task(&self, spec: &TaskSpec, entry: TaskEntry) -> Result<(), SchedulerError> {
        spec.validate()?;

        debug!(
            name = %spec.name,
            stack_size = spec.stack_size,
            priority = spec.priority.0,
            "spawning loop thread"
        );

        // JoinHandle は捨てる（detach）。終了の待ち合わせは LoopSignal が担う
        thread::Builder::new()
            .name(spec.name.clone())
            .stack_size(spec.stack_size)
            .spawn(entry)
            .map_err(|e| {
                error!(name = %spec.name, error = %e, "failed to spawn loop thread");
                SchedulerError::Spawn(e)
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn entry_runs_on_named_thread() {
        let (tx, rx) = mpsc::channel();
        let spec = TaskSpec::new("looptask-test").with_stack_size(256 * 1024);

        ThreadScheduler::new()
            .create_task(
                &spec,
                Box::new(move || {
                    let name = thread::current().name().map(str::to_owned);
                    tx.send(name).unwrap();
                }),
            )
            .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("looptask-test"));
    }

    #[test]
    fn invalid_spec_never_runs_entry() {
        let (tx, rx) = mpsc::channel::<()>();
        let spec = TaskSpec::new("looptask-test").with_stack_size(0);

        let result = ThreadScheduler::new().create_task(
            &spec,
            Box::new(move || {
                tx.send(()).unwrap();
            }),
        );

        assert!(matches!(result, Err(SchedulerError::InvalidSpec(_))));
        // entry は drop されているので送信側も閉じている
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
