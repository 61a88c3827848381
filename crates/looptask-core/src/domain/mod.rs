//! Domain - ループ監督の値型
//!
//! - **disposition**: step 関数の戻り値（Continue / Stop）
//! - **state**: 制御ブロックの状態（Running / Stopping / Stopped）と終了理由
//! - **ids**: LoopId（ULID ベース）
//! - **spec**: TaskSpec（name, stack_size, priority）
//! - **report**: LoopReport（join 時に返す実行記録）
//! - **errors**: SchedulerError / SpawnError / HealthError

pub mod disposition;
pub mod errors;
pub mod ids;
pub mod report;
pub mod spec;
pub mod state;

pub use self::disposition::{Disposition, InvalidDisposition};
pub use self::errors::{HealthError, SchedulerError, SpawnError};
pub use self::ids::LoopId;
pub use self::report::LoopReport;
pub use self::spec::{DEFAULT_STACK_SIZE, Priority, TaskSpec};
pub use self::state::{ExitReason, LoopState};
