//! NoopHealthCheck - 常に成功するヘルスチェック
//!
//! プラットフォーム固有のチェック（スタック残量など）が無い環境でのデフォルト。
//! 独自のチェックはクロージャを渡せばよい（`HealthCheck` は `Fn` に実装済み）。

use crate::domain::HealthError;
use crate::ports::HealthCheck;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHealthCheck;

impl HealthCheck for NoopHealthCheck {
    fn check(&self) -> Result<(), HealthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_always_passes() {
        assert_eq!(NoopHealthCheck.check(), Ok(()));
    }

    #[test]
    fn closures_are_health_checks() {
        let failing = || -> Result<(), HealthError> { Err(HealthError::Failed("stack".into())) };
        assert_eq!(
            failing.check(),
            Err(HealthError::Failed("stack".to_string()))
        );
    }
}
