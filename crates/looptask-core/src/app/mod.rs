//! App - ループ監督
//!
//! # 主要コンポーネント
//! - **LoopSupervisor**: spawn（制御ブロックの生成とタスクの作成）
//! - **LoopHandle**: request_stop / join / 状態の参照
//! - **StopHandle**: 任意のタスクから停止要求を出すためのハンドル
//! - **LoopSignal**: 停止要求フラグと完了フラグ
//! - **Step**: 1 反復ぶんの処理
//! - **SupervisorBuilder**: 協力者（Scheduler, HealthCheck, Clock）のワイヤリング

pub mod builder;
mod fatal;
pub mod signal;
pub mod step;
pub mod supervisor;

pub use self::builder::SupervisorBuilder;
pub use self::signal::LoopSignal;
pub use self::step::{Coded, Step, coded};
pub use self::supervisor::{LoopHandle, LoopSupervisor, StopHandle};
