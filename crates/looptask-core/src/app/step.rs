//! Step trait - 1 反復ぶんの処理
//!
//! # 使用例
//! ```ignore
//! let handle = supervisor.spawn(
//!     |count: &mut u64| {
//!         *count += 1;
//!         Disposition::Continue
//!     },
//!     0_u64,
//!     TaskSpec::new("counter"),
//! )?;
//! ```

use crate::domain::Disposition;

use super::fatal::fatal;

/// Step はループタスク上で 1 反復ごとに呼ばれる
///
/// ループ実行中、context に触れるのは step だけ。
/// step の中で眠る・待つのは自由だが、無期限に待つ場合は
/// 停止要求の後に呼び出し側が自分でその待ちを起こす必要がある。
pub trait Step<C>: Send + 'static {
    fn step(&mut self, context: &mut C) -> Disposition;
}

impl<C, F> Step<C> for F
where
    F: FnMut(&mut C) -> Disposition + Send + 'static,
{
    fn step(&mut self, context: &mut C) -> Disposition {
        self(context)
    }
}

/// 数値コードで disposition を返す関数のアダプタ
///
/// 0 = Continue, 1 = Stop。それ以外は契約違反としてプロセスを abort する。
pub struct Coded<F>(F);

/// `Coded` を作る
pub fn coded<C, F>(f: F) -> Coded<F>
where
    F: FnMut(&mut C) -> u8 + Send + 'static,
{
    Coded(f)
}

impl<C, F> Step<C> for Coded<F>
where
    F: FnMut(&mut C) -> u8 + Send + 'static,
{
    fn step(&mut self, context: &mut C) -> Disposition {
        let code = (self.0)(context);
        match Disposition::try_from(code) {
            Ok(disposition) => disposition,
            Err(e) => fatal(format_args!("step returned {e}")),
        }
    }
}
