//! LoopSupervisor - ループタスクの spawn / request_stop / join
//!
//! # フロー
//! 1. spawn: 制御ブロックを作り、Scheduler にループドライバを載せたタスクを作らせる
//! 2. ループドライバ: 停止要求を確認 → step → ヘルスチェック → disposition で分岐
//! 3. 反復サイクルを抜けたら context を制御ブロックに戻し、完了フラグを立てる
//! 4. join: 完了フラグを待ち、context を呼び出し側に返す
//!
//! # 所有権
//! - spawn で context は監督側に move される。呼び出し側からは join まで触れない
//! - join は `self` を消費するので、2 回目の join はコンパイルエラーになる

use std::panic;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, debug_span, error, trace};

use crate::domain::{
    Disposition, ExitReason, LoopId, LoopReport, LoopState, Priority, SpawnError, TaskSpec,
};
use crate::impls::{NoopHealthCheck, ThreadScheduler};
use crate::ports::{Clock, HealthCheck, Scheduler, SystemClock};

use super::builder::SupervisorBuilder;
use super::fatal::{abort_on_panic, fatal};
use super::signal::LoopSignal;
use super::step::Step;

/// 制御ブロック内の step と context の置き場所
enum Slot<C> {
    /// spawn 直後、ループタスクがまだ取り出していない
    Pending { step: Box<dyn Step<C>>, context: C },
    /// ループタスクが所有している
    Running,
    /// ループが終了し、join を待っている
    Finished { context: C, report: LoopReport },
    /// join（または spawn 失敗）で取り出し済み
    Taken,
}

impl<C> Slot<C> {
    fn label(&self) -> &'static str {
        match self {
            Slot::Pending { .. } => "pending",
            Slot::Running => "running",
            Slot::Finished { .. } => "finished",
            Slot::Taken => "taken",
        }
    }
}

/// 1 つのループにつき 1 つ
struct ControlBlock<C> {
    id: LoopId,
    name: String,
    signal: Arc<LoopSignal>,
    slot: Mutex<Slot<C>>,
}

impl<C> ControlBlock<C> {
    fn replace_slot(&self, next: Slot<C>) -> Slot<C> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }

    /// ループタスク開始時: Pending → Running
    fn begin(&self) -> (Box<dyn Step<C>>, C) {
        match self.replace_slot(Slot::Running) {
            Slot::Pending { step, context } => (step, context),
            other => fatal(format_args!(
                "loop entry of {} ran without a pending step (slot={})",
                self.id,
                other.label()
            )),
        }
    }

    /// ループ終了時: Running → Finished
    fn finish(&self, context: C, report: LoopReport) {
        let previous = self.replace_slot(Slot::Finished { context, report });
        debug_assert!(matches!(previous, Slot::Running));
    }

    /// spawn 失敗時: Pending → Taken
    fn reclaim(&self) -> C {
        match self.replace_slot(Slot::Taken) {
            Slot::Pending { context, .. } => context,
            other => fatal(format_args!(
                "scheduler reported failure for {} but the loop entry already ran (slot={})",
                self.id,
                other.label()
            )),
        }
    }

    /// join: Finished → Taken
    fn take_finished(&self) -> (C, LoopReport) {
        match self.replace_slot(Slot::Taken) {
            Slot::Finished { context, report } => (context, report),
            other => fatal(format_args!(
                "join on {} observed completion without a finished context (slot={})",
                self.id,
                other.label()
            )),
        }
    }
}

/// LoopSupervisor はループタスクを生成する
///
/// Scheduler / HealthCheck / Clock は外部協力者として注入する。
/// `LoopSupervisor::new()` は OS スレッド・ヘルスチェックなし・実時間を使う。
pub struct LoopSupervisor {
    scheduler: Arc<dyn Scheduler>,
    health: Arc<dyn HealthCheck>,
    clock: Arc<dyn Clock>,
}

impl LoopSupervisor {
    pub fn new() -> Self {
        Self::from_parts(
            Arc::new(ThreadScheduler::new()),
            Arc::new(NoopHealthCheck),
            Arc::new(SystemClock),
        )
    }

    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    pub(crate) fn from_parts(
        scheduler: Arc<dyn Scheduler>,
        health: Arc<dyn HealthCheck>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler,
            health,
            clock,
        }
    }

    /// ループタスクを開始する
    ///
    /// # Errors
    /// Scheduler がタスクを作れなかった場合は `SpawnError` を返す。
    /// このときタスクは動いておらず、context は `SpawnError::into_context()` で取り戻せる。
    pub fn spawn<C, S>(
        &self,
        step: S,
        context: C,
        spec: TaskSpec,
    ) -> Result<LoopHandle<C>, SpawnError<C>>
    where
        C: Send + 'static,
        S: Step<C>,
    {
        let block = Arc::new(ControlBlock {
            id: LoopId::generate(),
            name: spec.name.clone(),
            signal: Arc::new(LoopSignal::new()),
            slot: Mutex::new(Slot::Pending {
                step: Box::new(step),
                context,
            }),
        });

        let driver = LoopDriver {
            block: Arc::clone(&block),
            health: Arc::clone(&self.health),
            clock: Arc::clone(&self.clock),
        };

        if let Err(e) = self
            .scheduler
            .create_task(&spec, Box::new(move || driver.run()))
        {
            error!(loop_id = %block.id, name = %spec.name, error = %e, "failed to create loop task");
            return Err(SpawnError::new(block.reclaim(), e));
        }

        debug!(
            loop_id = %block.id,
            name = %spec.name,
            stack_size = spec.stack_size,
            priority = spec.priority.0,
            "loop spawned"
        );
        Ok(LoopHandle { block })
    }

    /// `spawn` の位置引数版
    pub fn spawn_with<C, S>(
        &self,
        step: S,
        context: C,
        name: &str,
        stack_size: usize,
        priority: Priority,
    ) -> Result<LoopHandle<C>, SpawnError<C>>
    where
        C: Send + 'static,
        S: Step<C>,
    {
        let spec = TaskSpec::new(name)
            .with_stack_size(stack_size)
            .with_priority(priority);
        self.spawn(step, context, spec)
    }
}

impl Default for LoopSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

/// ループタスク上で動く部分
struct LoopDriver<C> {
    block: Arc<ControlBlock<C>>,
    health: Arc<dyn HealthCheck>,
    clock: Arc<dyn Clock>,
}

impl<C: Send + 'static> LoopDriver<C> {
    fn run(self) {
        let span = debug_span!("loop", loop_id = %self.block.id, name = %self.block.name);
        let _enter = span.enter();

        let (mut step, mut context) = self.block.begin();

        let started_at = self.now();
        let (iterations, exit_reason) = self.iterate(step.as_mut(), &mut context);
        let report = LoopReport {
            loop_id: self.block.id,
            name: self.block.name.clone(),
            iterations,
            exit_reason,
            started_at,
            stopped_at: self.now(),
        };

        // step は join より先にループタスク上で drop する
        drop(step);
        self.block.finish(context, report);

        // 制御ブロックへの参照を手放してから完了を通知する。
        // 以後、制御ブロックを解放するのは join だけ
        let signal = Arc::clone(&self.block.signal);
        drop(self);
        signal.mark_completed();

        debug!("loop task stopped");
    }

    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        abort_on_panic("clock", self.block.id, || self.clock.now())
    }

    fn iterate(&self, step: &mut dyn Step<C>, context: &mut C) -> (u64, ExitReason) {
        let mut iterations: u64 = 0;

        loop {
            if self.block.signal.is_stop_requested() {
                debug!(iterations, "loop stopping due to stop request");
                return (iterations, ExitReason::StopRequested);
            }

            let disposition = abort_on_panic("step", self.block.id, || step.step(context));
            iterations += 1;
            trace!(iteration = iterations, ?disposition, "step returned");

            // panic も Err も致命的
            if let Err(e) = abort_on_panic("health check", self.block.id, || self.health.check()) {
                fatal(format_args!("{} after step of {}", e, self.block.id));
            }

            match disposition {
                Disposition::Continue => {}
                Disposition::Stop => {
                    debug!(iterations, "loop stopping because step returned stop");
                    return (iterations, ExitReason::StepFinished);
                }
            }
        }
    }
}

/// LoopHandle は spawn 成功で得られるハンドル
///
/// - `request_stop()`: 非ブロッキング・冪等
/// - `join()`: 完了まで待ち、context を返す（ハンドルを消費する）
///
/// join せずに drop した場合、ループはそのまま動き続け、
/// 終了時に context とともに制御ブロックが解放される。
#[must_use = "a loop handle must be joined to recover the context"]
pub struct LoopHandle<C> {
    block: Arc<ControlBlock<C>>,
}

impl<C> LoopHandle<C> {
    pub fn id(&self) -> LoopId {
        self.block.id
    }

    pub fn name(&self) -> &str {
        &self.block.name
    }

    /// 停止要求を出す
    ///
    /// ループは次の反復の先頭でこれを観測する。実行中の step は中断しない。
    pub fn request_stop(&self) {
        if self.block.signal.request_stop() {
            debug!(loop_id = %self.block.id, "stop requested");
        }
    }

    /// 他のタスク（ループ自身の step を含む）に渡せる停止専用ハンドル
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            id: self.block.id,
            signal: Arc::clone(&self.block.signal),
        }
    }

    pub fn state(&self) -> LoopState {
        self.block.signal.state()
    }

    /// 完了フラグが立っていれば true（join はブロックしない）
    pub fn is_finished(&self) -> bool {
        self.block.signal.is_completed()
    }

    /// ループの終了を待ち、context を取り戻す
    ///
    /// request_stop 前に呼んでもよい。その場合 step が Stop を返すまで待つ。
    pub fn join(self) -> C {
        self.join_with_report().0
    }

    /// `join` と同じだが、実行記録も返す
    pub fn join_with_report(self) -> (C, LoopReport) {
        debug!(loop_id = %self.block.id, "joining loop");

        self.block.signal.wait_completed();
        let (context, report) = self.block.take_finished();
        self.block.signal.mark_released();

        debug!(
            loop_id = %self.block.id,
            iterations = report.iterations,
            exit_reason = ?report.exit_reason,
            "loop joined"
        );
        (context, report)
    }
}

impl<C: Send + 'static> LoopHandle<C> {
    /// tokio ランタイムから join する
    ///
    /// ブロッキングな待ちは spawn_blocking に逃がす。
    pub async fn join_async(self) -> C {
        match tokio::task::spawn_blocking(move || self.join()).await {
            Ok(context) => context,
            Err(e) if e.is_panic() => panic::resume_unwind(e.into_panic()),
            Err(e) => fatal(format_args!("blocking join did not complete: {e}")),
        }
    }
}

impl<C> std::fmt::Debug for LoopHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopHandle")
            .field("id", &self.block.id)
            .field("name", &self.block.name)
            .field("state", &self.state())
            .finish()
    }
}

/// StopHandle は停止要求だけを出せるハンドル
///
/// `Clone + Send + Sync` なので任意のタスクに配れる。
/// join 後に使うのは呼び出し側のバグ（debug ビルドでは assert で検出する）。
#[derive(Debug, Clone)]
pub struct StopHandle {
    id: LoopId,
    signal: Arc<LoopSignal>,
}

impl StopHandle {
    pub fn loop_id(&self) -> LoopId {
        self.id
    }

    pub fn request_stop(&self) {
        debug_assert!(
            !self.signal.is_released(),
            "request_stop on {} after it was joined",
            self.id
        );
        if self.signal.request_stop() {
            debug!(loop_id = %self.id, "stop requested");
        }
    }

    pub fn is_stop_requested(&self) -> bool {
        self.signal.is_stop_requested()
    }
}
