//! SupervisorBuilder - LoopSupervisor の構築とワイヤリング
//!
//! # 使用例
//! ```ignore
//! let supervisor = LoopSupervisor::builder()
//!     .scheduler(ThreadScheduler::new())
//!     .health_check(|| Ok(()))
//!     .build();
//! ```
//!
//! 指定しなかった協力者はデフォルト（ThreadScheduler, NoopHealthCheck, SystemClock）になる。

use std::sync::Arc;

use crate::impls::{NoopHealthCheck, ThreadScheduler};
use crate::ports::{Clock, HealthCheck, Scheduler, SystemClock};

use super::supervisor::LoopSupervisor;

#[derive(Default)]
pub struct SupervisorBuilder {
    scheduler: Option<Arc<dyn Scheduler>>,
    health: Option<Arc<dyn HealthCheck>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// タスク生成に使う Scheduler
    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Arc::new(scheduler));
        self
    }

    /// 反復ごとのヘルスチェック
    pub fn health_check(mut self, health: impl HealthCheck + 'static) -> Self {
        self.health = Some(Arc::new(health));
        self
    }

    /// LoopReport の時刻に使う Clock
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn build(self) -> LoopSupervisor {
        LoopSupervisor::from_parts(
            self.scheduler
                .unwrap_or_else(|| Arc::new(ThreadScheduler::new())),
            self.health.unwrap_or_else(|| Arc::new(NoopHealthCheck)),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Disposition, TaskSpec};

    #[test]
    fn default_builder_spawns_on_threads() {
        let supervisor = SupervisorBuilder::new().build();
        let handle = supervisor
            .spawn(|_: &mut u8| Disposition::Stop, 9_u8, TaskSpec::new("built"))
            .unwrap();
        assert_eq!(handle.join(), 9);
    }
}
