//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **ThreadScheduler**: OS スレッドでループタスクを実行する Scheduler
//! - **NoopHealthCheck**: 何もしないヘルスチェック（デフォルト）

pub mod health;
pub mod thread_scheduler;

pub use self::health::NoopHealthCheck;
pub use self::thread_scheduler::ThreadScheduler;
