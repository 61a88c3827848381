//! LoopReport - join 時に返すループの実行記録

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::LoopId;
use super::state::ExitReason;

/// A summary of one finished loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopReport {
    pub loop_id: LoopId,
    pub name: String,
    /// step の呼び出し回数
    pub iterations: u64,
    pub exit_reason: ExitReason,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

impl LoopReport {
    /// ループが実行されていた時間（時計が戻った場合は 0）
    pub fn elapsed(&self) -> chrono::Duration {
        (self.stopped_at - self.started_at).max(chrono::Duration::zero())
    }
}
