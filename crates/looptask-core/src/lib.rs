//! looptask-core
//!
//! 繰り返し実行されるバックグラウンド処理（ループタスク）の最小の監督。
//!
//! - **spawn**: step 関数を停止するまで繰り返し呼ぶタスクを開始する
//! - **request_stop**: 協調的な停止要求（非ブロッキング）
//! - **join**: 終了を待ち、step が使っていた context を取り戻す
//!
//! # モジュール構成
//! - **domain**: 値型（Disposition, LoopState, TaskSpec, LoopReport, errors）
//! - **ports**: 外部協力者の抽象化（Scheduler, HealthCheck, Clock）
//! - **impls**: ports の実装（ThreadScheduler, NoopHealthCheck）
//! - **app**: ループ監督本体（LoopSupervisor, LoopHandle, StopHandle）
//! - **observability**: tracing の初期化

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use self::app::{LoopHandle, LoopSupervisor, Step, StopHandle, SupervisorBuilder};
pub use self::domain::{Disposition, LoopState, SpawnError, TaskSpec};
