//! HealthCheck port - 反復ごとの健全性チェック

use crate::domain::HealthError;

/// HealthCheck は step が戻るたびに 1 回呼ばれる
///
/// 失敗はループ監督にとって致命的で、プロセスを abort する。
/// 呼び出しはループタスク上で行われる。
pub trait HealthCheck: Send + Sync {
    fn check(&self) -> Result<(), HealthError>;
}

impl<F> HealthCheck for F
where
    F: Fn() -> Result<(), HealthError> + Send + Sync,
{
    fn check(&self) -> Result<(), HealthError> {
        self()
    }
}
