//! Ports - 外部協力者の抽象化
//!
//! ループ監督はスケジューリング・ヘルスチェック・時刻を自分では実装しない。
//! 各 trait はその契約だけを定義し、実装は `impls` に置く。

pub mod clock;
pub mod health;
pub mod scheduler;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::health::HealthCheck;
pub use self::scheduler::{Scheduler, TaskEntry};
