//! Disposition - step 関数が 1 回の反復ごとに返す判定

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Disposition は step の後にループを続けるかどうかを表す
///
/// - `Continue`: 次の反復へ（先に停止要求を確認する）
/// - `Stop`: ループを恒久的に抜ける
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Continue,
    Stop,
}

impl Disposition {
    /// 数値コード表現（Continue = 0, Stop = 1）
    pub const fn code(self) -> u8 {
        match self {
            Disposition::Continue => 0,
            Disposition::Stop => 1,
        }
    }

    pub fn is_stop(self) -> bool {
        self == Disposition::Stop
    }
}

/// 定義されていない disposition コード
///
/// ループ内で観測された場合は契約違反であり、回復せずにプロセスを abort する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid disposition code {0}")]
pub struct InvalidDisposition(pub u8);

impl TryFrom<u8> for Disposition {
    type Error = InvalidDisposition;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Disposition::Continue),
            1 => Ok(Disposition::Stop),
            other => Err(InvalidDisposition(other)),
        }
    }
}

impl From<Disposition> for u8 {
    fn from(disposition: Disposition) -> Self {
        disposition.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::continue_(0, Disposition::Continue)]
    #[case::stop(1, Disposition::Stop)]
    fn known_codes_convert(#[case] code: u8, #[case] expected: Disposition) {
        assert_eq!(Disposition::try_from(code), Ok(expected));
        assert_eq!(u8::from(expected), code);
    }

    #[rstest]
    #[case(2)]
    #[case(7)]
    #[case(u8::MAX)]
    fn unknown_codes_are_rejected(#[case] code: u8) {
        let err = Disposition::try_from(code).unwrap_err();
        assert_eq!(err, InvalidDisposition(code));
        assert!(err.to_string().contains(&code.to_string()));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Disposition::Continue).unwrap();
        assert_eq!(json, "\"continue\"");
    }
}
