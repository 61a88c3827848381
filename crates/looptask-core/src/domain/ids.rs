//! LoopId - 制御ブロックの識別子
//!
//! ログの相関に使う。ULID なので生成順にソートできる。

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier of one supervised loop (one control block).
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoopId(Ulid);

impl LoopId {
    /// 新しい LoopId を生成
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl From<Ulid> for LoopId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loop-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_loop_prefix() {
        let ulid = Ulid::new();
        let id = LoopId::from_ulid(ulid);
        assert_eq!(id.to_string(), format!("loop-{ulid}"));
        assert_eq!(id.as_ulid(), ulid);
    }

    #[test]
    fn generated_ids_are_unique_and_sortable() {
        let id1 = LoopId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2)); // 時刻が進むのを待つ
        let id2 = LoopId::generate();

        assert_ne!(id1, id2);
        assert!(id1 < id2);
    }

    #[test]
    fn loop_id_can_be_serialized() {
        let id = LoopId::generate();
        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: LoopId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
